use anyhow::Result;
use clap::Parser;
use shared::Config;

mod app;
mod audio;

use app::PlayerApp;
use audio::CpalToneEngine;

#[derive(Parser)]
#[command(name = "mindful-player")]
#[command(about = "Guided meditation sessions with tone therapy")]
struct Args {
    /// Emotional state half of the exercise key (e.g. fear, joy)
    #[arg(short, long)]
    emotion: Option<String>,

    /// Need level half of the exercise key (e.g. safety, love_belonging)
    #[arg(short, long)]
    need: Option<String>,

    /// Print the exercise catalog and exit
    #[arg(long)]
    list: bool,

    /// Print audio output devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Run without tone playback
    #[arg(long)]
    silent: bool,

    /// Audio output device name (overrides config)
    #[arg(long)]
    device: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(device) = args.device {
        config.audio.device = Some(device);
    }

    let app = PlayerApp::new(config);

    if args.list {
        app.list_exercises();
        return Ok(());
    }

    if args.list_devices {
        for name in CpalToneEngine::list_output_devices()? {
            println!("{}", name);
        }
        return Ok(());
    }

    let emotion = args
        .emotion
        .map(|s| s.parse().map_err(anyhow::Error::msg))
        .transpose()?;
    let need = args
        .need
        .map(|s| s.parse().map_err(anyhow::Error::msg))
        .transpose()?;

    let exercise = app.select_exercise(emotion, need)?;
    app.print_exercise_card(&exercise);
    app.run(exercise, args.silent).await
}
