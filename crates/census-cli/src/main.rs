mod command;
mod logging;
mod prefs;
mod table;
mod tui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
