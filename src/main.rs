//! Binary entry point: resolve the data directory, start file logging, load the
//! saved library into a session catalog and drive the Ratatui event loop until
//! the user exits.
use book_library::{init_logging, run_app, App, Catalog, Config, Store};

/// Returning a `Result` bubbles fatal startup problems (an unreadable library
/// file, a missing home directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let config = Config::resolve()?;
    init_logging(&config.log_dir)?;

    let store = Store::new(&config.library_path);
    let (catalog, load_error) = Catalog::open(&store)?;

    let mut app = App::new(catalog, store);
    if load_error.is_some() {
        app.notify_load_failure();
    }
    run_app(&mut app)
}
