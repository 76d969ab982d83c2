use anyhow::Result;
use console::{Term, style};
use image_merger::config::Config;
use image_merger::init;
use image_merger::menu::{MenuSession, show_main_menu};
use image_merger::signal::setup_shutdown_signal;
use log::{info, warn};

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal();

    let config = Config::new()?;
    let mut session = MenuSession::new(config);

    loop {
        match show_main_menu(&term, &shutdown_signal, &mut session) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style("再見！").green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {}", style("錯誤:").red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}
