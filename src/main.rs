//! rdbhelper main entrypoint.

use rdbhelper::run;
use rdbhelper::ui::messages;

fn main() {
    if let Err(e) = run() {
        messages::error(e);
        std::process::exit(1);
    }
}
