use crate::config::Config;
use crate::db::{ConnectOptions, Database};
use crate::errors::AppResult;
use crate::ui::messages;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let db = Database::connect(ConnectOptions::from_config(cfg)?)?;
    db.ping()?;

    let info = db.session_info()?;
    messages::success("Connection OK");
    messages::field("Database", &info.path);
    messages::field("Charset", &info.charset);
    messages::field("Time zone", &info.time_zone);
    messages::field("Now", &info.now);

    Ok(())
}
