use clap::{Args, Parser, Subcommand};
use orbit::clock::{DriverEvent, FrameLoop};
use orbit::control::{self, ControlCommand};
use orbit::ribbon::RibbonLayout;
use orbit::sphere::SphereLayout;
use orbit::{AnimationDriver, AnimationState, Arrangement, Layout, LayoutKind, PhotoCount, SourceRef};

#[derive(Parser, Debug)]
#[command(name = "orbit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the keepsake overlay.
    Show,
    /// Hide the keepsake overlay
    Hide,
    /// Switch the overlay to the globe
    Sphere,
    /// Switch the overlay to the ribbon
    Ribbon,
    /// Ask the daemon to re-read its configuration
    Reload,
    /// Print one computed frame as JSON
    Frame {
        #[command(flatten)]
        arrangement: ArrangementArgs,

        /// Rotation (sphere) or scroll offset (ribbon)
        #[arg(short = 'p', long, default_value_t = 0.0, allow_hyphen_values = true)]
        param: f64,

        /// Drag offset added to the sphere rotation
        #[arg(short = 'o', long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset: f64,
    },
    /// Run the animation headlessly and log each frame
    Preview {
        #[command(flatten)]
        arrangement: ArrangementArgs,

        /// Number of frames to run before stopping
        #[arg(short = 'n', long, default_value_t = 60)]
        frames: usize,
    },
}

#[derive(Args, Debug, Clone)]
struct ArrangementArgs {
    /// Layout strategy (sphere, ribbon)
    #[arg(short = 'l', long, default_value_t = LayoutKind::Sphere)]
    layout: LayoutKind,

    /// Number of positions, photos are reused when there are fewer
    #[arg(short = 'c', long)]
    count: Option<usize>,

    /// Image paths or URLs
    photos: Vec<String>,
}

impl ArrangementArgs {
    fn layout(&self) -> Layout {
        Layout::from_kind(self.layout, &SphereLayout::default(), &RibbonLayout::default())
    }

    fn photos(&self) -> Vec<SourceRef> {
        self.photos.iter().cloned().map(SourceRef::from).collect()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show => send_command(ControlCommand::Show),
        Commands::Hide => send_command(ControlCommand::Hide),
        Commands::Sphere => send_command(ControlCommand::Sphere),
        Commands::Ribbon => send_command(ControlCommand::Ribbon),
        Commands::Reload => send_command(ControlCommand::Reload),
        Commands::Frame {
            arrangement,
            param,
            offset,
        } => print_frame(&arrangement, param, offset),
        Commands::Preview {
            arrangement,
            frames,
        } => preview(&arrangement, frames),
    }
}

fn send_command(cmd: ControlCommand) -> anyhow::Result<()> {
    control::send(cmd)?;
    Ok(())
}

fn print_frame(args: &ArrangementArgs, param: f64, offset: f64) -> anyhow::Result<()> {
    let items = orbit::photo::distribute(&args.photos(), PhotoCount::from(args.count));
    let state = AnimationState {
        primary: param,
        manual_offset: offset,
        dragging: false,
    };

    let frame = args.layout().compute_frame(&items, &state);
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}

fn preview(args: &ArrangementArgs, frames: usize) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let (tx, rx) = async_channel::bounded(8);
        let driver = AnimationDriver::new(args.layout(), PhotoCount::from(args.count));
        let mut frame_loop = FrameLoop::new(driver, tx);
        let photos = args.photos();

        frame_loop.activate(&photos, true);

        let mut seen = 0;
        while seen < frames {
            match rx.recv().await? {
                DriverEvent::Ready => log::info!("{} layout ready", args.layout),
                DriverEvent::Frame(frame) => {
                    seen += 1;
                    let front = frame.painter_order().last().map(|item| item.index);
                    log::info!(
                        "frame {seen}: {} items, front photo {:?}",
                        frame.items.len(),
                        front
                    );
                }
            }
        }

        frame_loop.activate(&photos, false);
        Ok::<(), anyhow::Error>(())
    })
}
