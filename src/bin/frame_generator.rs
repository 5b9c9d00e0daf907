use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tactical_view::io::{object_from_json, object_to_json};
use tactical_view::synthetic::{SyntheticConfig, generate_frames};
use tactical_view::{CourtConfig, FrameInput, ReferenceLayout};

#[derive(Parser)]
#[command(author, version, about = "Generate synthetic tactical view frames", long_about = None)]
struct Args {
    /// Output json file
    #[arg(short, long)]
    output: String,

    /// Court configuration json
    #[arg(long)]
    court: Option<String>,

    /// Number of frames to generate
    #[arg(short, long, default_value = "100")]
    num_frames: usize,

    /// Image width
    #[arg(long, default_value = "1920")]
    width: u32,

    /// Image height
    #[arg(long, default_value = "1080")]
    height: u32,

    /// Landmark jitter in pixels
    #[arg(long, default_value = "1.0")]
    noise: f32,

    /// Probability that a landmark is replaced by a random point
    #[arg(long, default_value = "0.05")]
    outlier_probability: f64,

    #[arg(long, default_value = "0")]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let court_config = match &args.court {
        Some(path) => object_from_json::<CourtConfig, _>(path)?,
        None => CourtConfig::default(),
    };
    let layout = ReferenceLayout::from_config(&court_config);
    let config = SyntheticConfig {
        image_width: args.width,
        image_height: args.height,
        noise_px: args.noise,
        outlier_probability: args.outlier_probability,
        ..Default::default()
    };

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let frames: Vec<FrameInput> = generate_frames(&layout, &config, args.num_frames, &mut rng)
        .into_iter()
        .map(|f| f.input)
        .collect();
    object_to_json(&args.output, &frames)?;

    info!("generated {} frames in {}", frames.len(), args.output);
    Ok(())
}
