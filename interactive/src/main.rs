use clap::Parser;

use log::error;

mod app;
mod args;
mod camera;
mod scene;
mod scene_loader;

use app::App;
use args::Args;
use scene_loader::SceneDescription;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = <Args as Parser>::parse();

    let description = match SceneDescription::load(&args.scene) {
        Ok(description) => description,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let app = match App::new(args.width, args.height, &description) {
        Ok(app) => app,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    app.run();
}
