// CLI entry point for the voxel shatter engine.
//
// Loads one body from a point-cloud file, applies destroy requests given on
// the command line (explicit coordinates and/or segments), and prints the
// resulting registry: every body with its parent, live voxel count, surface
// face count and collider. Useful for checking a source file or reproducing
// a split outside a host application. Set `RUST_LOG=debug` (or `trace`) to
// see batch and pair-level logging.
//
// Usage:
//   shatter --input <FILE> [OPTIONS]
//     --config <FILE>                  ShatterConfig JSON (default: built-in defaults)
//     --destroy <X,Y,Z>                Destroy one lattice voxel (repeatable)
//     --segment <X0,Y0,Z0,X1,Y1,Z1>    Destroy every voxel on a body-local segment (repeatable)
//     --print-config                   Print the effective config as JSON

use voxel_shatter::body::{BodyRegistry, DestroyReport};
use voxel_shatter::config::ShatterConfig;
use voxel_shatter::types::{BodyId, VoxelCoord};

/// One destroy request, applied in command-line order.
enum Request {
    Voxels(Vec<VoxelCoord>),
    Segment([f32; 3], [f32; 3]),
}

struct Args {
    input: String,
    config: Option<String>,
    requests: Vec<Request>,
    print_config: bool,
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let config = match &args.config {
        Some(path) => load_config(path),
        None => ShatterConfig::default(),
    };
    if args.print_config {
        match config.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize config: {e}");
                std::process::exit(1);
            }
        }
    }

    let mut registry = BodyRegistry::new(config);
    let root = match registry.load_source_file(&args.input) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", args.input);
            std::process::exit(1);
        }
    };
    log::info!("loaded {} from {}", root, args.input);

    // Requests always target the loaded body; fragments split off by earlier
    // requests keep their own coordinates and are left alone.
    for request in &args.requests {
        let report = match request {
            Request::Voxels(coords) => registry.destroy(root, coords),
            Request::Segment(from, to) => registry.destroy_along_segment(root, *from, *to),
        };
        print_report(&report);
    }

    print_registry(&registry);
}

fn load_config(path: &str) -> ShatterConfig {
    let json = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read config {path}: {e}");
        std::process::exit(1);
    });
    ShatterConfig::from_json(&json).unwrap_or_else(|e| {
        eprintln!("Invalid config {path}: {e}");
        std::process::exit(1);
    })
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching.
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut input = None;
    let mut config = None;
    let mut requests = Vec::new();
    let mut print_config = false;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    std::process::exit(1);
                }));
            }
            "--config" => {
                i += 1;
                config = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    std::process::exit(1);
                }));
            }
            "--destroy" => {
                i += 1;
                let [x, y, z] = args
                    .get(i)
                    .and_then(|s| parse_list::<i32, 3>(s))
                    .unwrap_or_else(|| {
                        eprintln!("--destroy requires X,Y,Z integers");
                        std::process::exit(1);
                    });
                requests.push(Request::Voxels(vec![VoxelCoord::new(x, y, z)]));
            }
            "--segment" => {
                i += 1;
                let [x0, y0, z0, x1, y1, z1] = args
                    .get(i)
                    .and_then(|s| parse_list::<f32, 6>(s))
                    .unwrap_or_else(|| {
                        eprintln!("--segment requires X0,Y0,Z0,X1,Y1,Z1 numbers");
                        std::process::exit(1);
                    });
                requests.push(Request::Segment([x0, y0, z0], [x1, y1, z1]));
            }
            "--print-config" => print_config = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let input = input.unwrap_or_else(|| {
        eprintln!("--input is required");
        print_usage();
        std::process::exit(1);
    });

    Args {
        input,
        config,
        requests,
        print_config,
    }
}

/// Parse exactly `N` comma-separated values.
fn parse_list<T: std::str::FromStr, const N: usize>(s: &str) -> Option<[T; N]> {
    let values: Vec<T> = s
        .split(',')
        .map(|part| part.trim().parse().ok())
        .collect::<Option<_>>()?;
    values.try_into().ok()
}

fn print_report(report: &DestroyReport) {
    println!(
        "destroyed {} voxel(s): {} pair(s) tested, {} separation(s), {} debris voxel(s), {} spawned",
        report.destroyed,
        report.pairs_tested,
        report.separations,
        report.debris_voxels,
        report.spawned,
    );
}

fn print_registry(registry: &BodyRegistry) {
    println!("{} bodies", registry.len());
    for body in registry.iter() {
        let parent = body
            .parent()
            .map_or_else(|| "-".to_string(), |p: BodyId| p.to_string());
        print!(
            "  {} parent={} live={} faces={}",
            body.id(),
            parent,
            body.graph().live_count(),
            body.mesh().face_count(),
        );
        match body.collider() {
            Some(c) => println!(
                " collider=center({:.3}, {:.3}, {:.3}) size({:.3}, {:.3}, {:.3})",
                c.center[0], c.center[1], c.center[2], c.size[0], c.size[1], c.size[2],
            ),
            None => println!(),
        }
    }
}

fn print_usage() {
    println!("Usage: shatter --input <FILE> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --input <FILE>                 Point-cloud source file (required)");
    println!("  --config <FILE>                ShatterConfig JSON (default: built-in defaults)");
    println!("  --destroy <X,Y,Z>              Destroy one lattice voxel (repeatable)");
    println!("  --segment <X0,Y0,Z0,X1,Y1,Z1>  Destroy voxels on a body-local segment (repeatable)");
    println!("  --print-config                 Print the effective config as JSON");
    println!("  --help, -h                     Show this help");
}
