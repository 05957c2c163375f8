//! Render a sample level to stdout and exit.

use delve_core::Console;
use delve_crossterm::TermPresenter;
use delve_demo::{DemoConfig, Level};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DemoConfig::default();
    let mut level = Level::build(&config, &mut rand::rng())?;
    level.look_around(config.sight);

    let mut console = Console::new(level.map.width(), level.map.height());
    level.map.render(&mut console, &level.entities);

    let mut presenter = TermPresenter::stdout();
    presenter.clear_screen()?;
    presenter.present(&console)?;
    presenter.finish(console.height())?;
    Ok(())
}
