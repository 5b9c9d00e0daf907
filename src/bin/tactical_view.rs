use clap::Parser;
use log::{info, warn};
use std::time::Instant;
use tactical_view::io::{object_from_json, object_to_json, write_report};
use tactical_view::{
    CourtConfig, FrameInput, HomographyConfig, HomographyMethod, ReferenceLayout,
    TacticalViewConverter, ValidatorConfig,
};

#[derive(Parser)]
#[command(version, about, author)]
struct TacticalViewCli {
    /// json array of frames: [{"landmarks": [[x, y], ...], "tracks": {"id": {"bbox": [x1, y1, x2, y2]}}}]
    #[arg(short, long)]
    input: String,

    /// output json with per frame positions
    #[arg(short, long, default_value = "tactical_positions.json")]
    output: String,

    /// court config json, defaults to a 28m x 15m basketball court on a 300x161 canvas
    #[arg(long)]
    court: Option<String>,

    /// use seeded ransac instead of plain least squares
    #[arg(long, default_value_t = false)]
    ransac: bool,

    /// relative error above which a landmark is rejected
    #[arg(long, default_value_t = 0.8)]
    threshold: f64,

    /// optional run report json
    #[arg(long)]
    report: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = TacticalViewCli::parse();

    let court_config = match &cli.court {
        Some(path) => object_from_json::<CourtConfig, _>(path)?,
        None => CourtConfig::default(),
    };
    let layout = ReferenceLayout::from_config(&court_config);
    let validator_config = ValidatorConfig {
        relative_error_threshold: cli.threshold,
    };
    let homography_config = HomographyConfig {
        method: if cli.ransac {
            HomographyMethod::Ransac
        } else {
            HomographyMethod::LeastSquares
        },
        ..Default::default()
    };
    let converter = TacticalViewConverter::new(layout, validator_config, homography_config)
        .with_progress(true);

    let frames: Vec<FrameInput> = object_from_json(&cli.input)?;
    let now = Instant::now();
    let outputs = converter.process_frames(&frames)?;
    let duration_sec = now.elapsed().as_secs_f64();
    info!("processing {} frames took {:.6} sec", frames.len(), duration_sec);

    for output in outputs.iter().filter(|o| !o.has_homography()) {
        warn!("frame {} has no tactical view", output.frame_index);
    }
    object_to_json(&cli.output, &outputs)?;

    if let Some(report_path) = &cli.report {
        let report = write_report(report_path, &outputs)?;
        info!(
            "{}/{} frames projected, {} landmarks rejected",
            report.frames_with_homography, report.total_frames, report.invalidated_landmarks
        );
    }
    Ok(())
}
