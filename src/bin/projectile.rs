use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;

use projectile_engine::{
    drag::cross_section_area, drag_free_optimal_angle_deg, terminal_velocity, Comparison, DragModel, EngineConfig,
    IntegratorConfig, LaunchParameters, OptimalAngleResult, SearchConfig, TrajectoryResult, TrajectoryService,
};

#[derive(Parser)]
#[command(name = "projectile")]
#[command(version)]
#[command(about = "Projectile trajectory calculator with and without air drag", long_about = None)]
struct Cli {
    /// Engine configuration file (JSON); flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drag-free trajectory from the closed-form solution
    Analytic {
        #[command(flatten)]
        launch: LaunchArgs,

        #[command(flatten)]
        physics: PhysicsArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,

        /// Show every sample instead of ten evenly spaced ones
        #[arg(long)]
        full: bool,
    },

    /// Drag-affected trajectory from the Euler integrator
    Numeric {
        #[command(flatten)]
        launch: LaunchArgs,

        #[command(flatten)]
        physics: PhysicsArgs,

        /// Integration time step (seconds)
        #[arg(long)]
        dt: Option<f64>,

        /// Drag model (vacuum, quadratic)
        #[arg(long)]
        drag_model: Option<String>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,

        /// Show every sample instead of ten evenly spaced ones
        #[arg(long)]
        full: bool,
    },

    /// Analytic and numeric results side by side
    Compare {
        #[command(flatten)]
        launch: LaunchArgs,

        #[command(flatten)]
        physics: PhysicsArgs,

        /// Integration time step (seconds)
        #[arg(long)]
        dt: Option<f64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Launch angle with the longest drag-affected range
    Optimize {
        /// Launch speed (m/s)
        #[arg(short = 's', long, default_value = "20.0")]
        speed: f64,

        #[command(flatten)]
        physics: PhysicsArgs,

        /// Lowest angle of the sweep (degrees)
        #[arg(long)]
        lo: Option<f64>,

        /// Highest angle of the sweep (degrees)
        #[arg(long)]
        hi: Option<f64>,

        /// Angle step of the sweep (degrees)
        #[arg(long)]
        step: Option<f64>,

        /// Integration time step (seconds)
        #[arg(long)]
        dt: Option<f64>,

        /// Evaluate sweep angles in parallel
        #[arg(long)]
        parallel: bool,

        /// Show this many sweep angles on each side of the optimum
        #[arg(long, default_value = "0")]
        neighbours: usize,

        /// Print every evaluated angle
        #[arg(long)]
        full_sweep: bool,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Display the active physical constants
    Info {
        #[command(flatten)]
        physics: PhysicsArgs,
    },
}

#[derive(Args)]
struct LaunchArgs {
    /// Launch angle above horizontal (degrees)
    #[arg(short = 'a', long, default_value = "45.0")]
    angle: f64,

    /// Launch speed (m/s)
    #[arg(short = 's', long, default_value = "20.0")]
    speed: f64,
}

impl LaunchArgs {
    fn params(&self) -> LaunchParameters {
        LaunchParameters::new(self.angle, self.speed)
    }
}

#[derive(Args)]
struct PhysicsArgs {
    /// Gravitational acceleration (m/s²)
    #[arg(long)]
    gravity: Option<f64>,

    /// Air density (kg/m³)
    #[arg(long)]
    air_density: Option<f64>,

    /// Drag coefficient
    #[arg(long)]
    drag_coefficient: Option<f64>,

    /// Ball radius (meters)
    #[arg(long)]
    radius: Option<f64>,

    /// Ball mass (kg)
    #[arg(long)]
    mass: Option<f64>,

    /// Launch height above ground (meters)
    #[arg(long)]
    launch_height: Option<f64>,
}

impl PhysicsArgs {
    fn apply(&self, config: &mut EngineConfig) {
        let c = &mut config.constants;
        if let Some(g) = self.gravity {
            c.gravity = g;
        }
        if let Some(rho) = self.air_density {
            c.air_density = rho;
        }
        if let Some(cd) = self.drag_coefficient {
            c.drag_coefficient = cd;
        }
        if let Some(r) = self.radius {
            c.cross_section_area = cross_section_area(r);
        }
        if let Some(m) = self.mass {
            c.mass = m;
        }
        if let Some(h) = self.launch_height {
            c.launch_height = h;
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

#[derive(Debug, Serialize)]
struct CompareRow {
    angle_deg: f64,
    speed_mps: f64,
    analytic_range: f64,
    numeric_range: f64,
    analytic_max_height: f64,
    numeric_max_height: f64,
    analytic_flight_time: f64,
    numeric_flight_time: f64,
    range_loss_percent: f64,
}

impl From<&Comparison> for CompareRow {
    fn from(c: &Comparison) -> Self {
        Self {
            angle_deg: c.params.angle_degrees,
            speed_mps: c.params.speed,
            analytic_range: c.analytic.range(),
            numeric_range: c.numeric.range(),
            analytic_max_height: c.analytic.max_height(),
            numeric_max_height: c.numeric.max_height(),
            analytic_flight_time: c.analytic.flight_time(),
            numeric_flight_time: c.numeric.flight_time(),
            range_loss_percent: 100.0 * c.range_loss_fraction(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Analytic {
            launch,
            physics,
            output,
            full,
        } => {
            physics.apply(&mut config);
            let service = TrajectoryService::from_config(&config)?;
            let result = service.compute_analytic(&launch.params())?;
            display_trajectory("ANALYTIC TRAJECTORY (NO DRAG)", &result, output, full)?;
        }

        Commands::Numeric {
            launch,
            physics,
            dt,
            drag_model,
            output,
            full,
        } => {
            physics.apply(&mut config);
            let mut service = TrajectoryService::from_config(&config)?;
            if let Some(name) = drag_model {
                let drag_model = match DragModel::from_str(&name) {
                    Some(model) => model,
                    None => {
                        eprintln!("Invalid drag model: {}. Using quadratic.", name);
                        DragModel::Quadratic
                    }
                };
                service = service.with_integrator_config(IntegratorConfig {
                    drag_model,
                    ..*service.integrator_config()
                })?;
            }
            let result = match dt {
                Some(dt) => service.compute_numeric(&launch.params(), dt)?,
                None => service.compute_numeric_default(&launch.params())?,
            };
            display_trajectory("NUMERIC TRAJECTORY (WITH DRAG)", &result, output, full)?;
        }

        Commands::Compare {
            launch,
            physics,
            dt,
            output,
        } => {
            physics.apply(&mut config);
            let dt = dt.unwrap_or(config.integrator.time_step_s);
            let service = TrajectoryService::from_config(&config)?;
            let comparison = service.compare(&launch.params(), dt)?;
            display_comparison(&comparison, output)?;
        }

        Commands::Optimize {
            speed,
            physics,
            lo,
            hi,
            step,
            dt,
            parallel,
            neighbours,
            full_sweep,
            output,
        } => {
            physics.apply(&mut config);
            let search = SearchConfig {
                lo_angle_deg: lo.unwrap_or(config.search.lo_angle_deg),
                hi_angle_deg: hi.unwrap_or(config.search.hi_angle_deg),
                angle_step_deg: step.unwrap_or(config.search.angle_step_deg),
                time_step_s: dt.unwrap_or(config.search.time_step_s),
                include_sweep: config.search.include_sweep || full_sweep || neighbours > 0,
                parallel: config.search.parallel || parallel,
            };
            let service = TrajectoryService::from_config(&config)?;
            let result = service.find_optimal_angle(speed, &search)?;
            display_optimum(speed, &result, neighbours, full_sweep, output)?;
        }

        Commands::Info { physics } => {
            physics.apply(&mut config);
            let service = TrajectoryService::from_config(&config)?;
            display_info(&service);
        }
    }

    Ok(())
}

fn display_trajectory(
    title: &str,
    result: &TrajectoryResult,
    format: OutputFormat,
    full: bool,
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }

        OutputFormat::Csv => {
            println!("x,y");
            for s in result.samples() {
                println!("{:.4},{:.4}", s.x, s.y);
            }
        }

        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║ {:<38} ║", title);
            println!("╠════════════════════════════════════════╣");
            println!("║ Range:             {:>8.2} m          ║", result.range());
            println!("║ Max Height:        {:>8.2} m          ║", result.max_height());
            println!("║ Time of Flight:    {:>8.3} s          ║", result.flight_time());
            println!("║ Samples:           {:>8}            ║", result.len());
            println!("╚════════════════════════════════════════╝");

            let samples = result.samples();
            let stride = if full { 1 } else { (samples.len() / 10).max(1) };
            println!("\nTrajectory Points:");
            println!("┌──────────┬──────────┐");
            println!("│  X (m)   │  Y (m)   │");
            println!("├──────────┼──────────┤");
            for (i, s) in samples.iter().enumerate() {
                if i % stride == 0 || i == samples.len() - 1 {
                    println!("│ {:>8.2} │ {:>8.2} │", s.x, s.y);
                }
            }
            println!("└──────────┴──────────┘");
        }
    }

    Ok(())
}

fn display_comparison(comparison: &Comparison, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    let row = CompareRow::from(comparison);
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&row)?);
        }

        OutputFormat::Csv => {
            println!("metric,analytic,numeric");
            println!("range,{:.4},{:.4}", row.analytic_range, row.numeric_range);
            println!("max_height,{:.4},{:.4}", row.analytic_max_height, row.numeric_max_height);
            println!("flight_time,{:.4},{:.4}", row.analytic_flight_time, row.numeric_flight_time);
        }

        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║  {:>5.1}° at {:>6.2} m/s                  ║", row.angle_deg, row.speed_mps);
            println!("╠══════════════╦═════════════╦═══════════╣");
            println!("║              ║   No drag   ║ With drag ║");
            println!("╠══════════════╬═════════════╬═══════════╣");
            println!(
                "║ Range (m)    ║ {:>11.2} ║ {:>9.2} ║",
                row.analytic_range, row.numeric_range
            );
            println!(
                "║ Height (m)   ║ {:>11.2} ║ {:>9.2} ║",
                row.analytic_max_height, row.numeric_max_height
            );
            println!(
                "║ Time (s)     ║ {:>11.2} ║ {:>9.2} ║",
                row.analytic_flight_time, row.numeric_flight_time
            );
            println!("╚══════════════╩═════════════╩═══════════╝");
            println!("Range lost to drag: {:.1}%", row.range_loss_percent);
        }
    }

    Ok(())
}

fn display_optimum(
    speed: f64,
    result: &OptimalAngleResult,
    neighbours: usize,
    full_sweep: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let rows = if full_sweep {
        result.sweep.as_deref().unwrap_or(&[])
    } else {
        result.neighbourhood(neighbours)
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }

        OutputFormat::Csv => {
            println!("angle_deg,range");
            if rows.is_empty() {
                println!("{:.4},{:.4}", result.angle, result.max_range);
            }
            for p in rows {
                println!("{:.4},{:.4}", p.angle_deg, p.range);
            }
        }

        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║         OPTIMAL LAUNCH ANGLE           ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Speed:             {:>8.2} m/s        ║", speed);
            println!("║ Best Angle:        {:>8.2} °          ║", result.angle);
            println!("║ Max Range:         {:>8.2} m          ║", result.max_range);
            println!("╚════════════════════════════════════════╝");

            if !rows.is_empty() {
                println!("\nSweep:");
                println!("┌──────────┬──────────┐");
                println!("│ Angle(°) │  Range   │");
                println!("├──────────┼──────────┤");
                for p in rows {
                    let marker = if p.angle_deg == result.angle { " <" } else { "" };
                    println!("│ {:>8.2} │ {:>8.2} │{}", p.angle_deg, p.range, marker);
                }
                println!("└──────────┴──────────┘");
            }
        }
    }

    Ok(())
}

fn display_info(service: &TrajectoryService) {
    let c = service.constants();
    let limits = service.limits();
    let integrator = service.integrator_config();

    println!("╔════════════════════════════════════════╗");
    println!("║      PROJECTILE ENGINE v{:<15}║", env!("CARGO_PKG_VERSION"));
    println!("╠════════════════════════════════════════╣");
    println!("║ Gravity:           {:>8.3} m/s²       ║", c.gravity);
    println!("║ Air Density:       {:>8.3} kg/m³      ║", c.air_density);
    println!("║ Drag Coefficient:  {:>8.3}            ║", c.drag_coefficient);
    println!("║ Cross Section:     {:>8.5} m²         ║", c.cross_section_area);
    println!("║ Mass:              {:>8.3} kg         ║", c.mass);
    println!("║ Launch Height:     {:>8.2} m          ║", c.launch_height);
    println!("╠════════════════════════════════════════╣");
    match terminal_velocity(c) {
        Some(v) => println!("║ Terminal Velocity: {:>8.2} m/s        ║", v),
        None => println!("║ Terminal Velocity:     none           ║"),
    }
    println!("║ Time Step:         {:>8.4} s          ║", integrator.time_step_s);
    println!("║ Drag Model:        {:>8}            ║", integrator.drag_model.to_string());
    println!(
        "║ Angles:            {:>5.1}° .. {:>5.1}°     ║",
        limits.min_angle_deg, limits.max_angle_deg
    );
    println!(
        "║ Speeds:         {:>6.1} .. {:>6.1} m/s   ║",
        limits.min_speed_mps, limits.max_speed_mps
    );
    if let Ok(angle) = drag_free_optimal_angle_deg(20.0, c) {
        println!("║ No-drag Optimum @20 m/s: {:>6.2}°       ║", angle);
    }
    println!("╚════════════════════════════════════════╝");
}
