use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use gk2::config::Config;
use gk2::{logging, Color, EditorSession, Error, Result, Shape, Vec2};

// ── Command Line ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "gk2", version, about = "Inspect and edit GK2 annotation projects")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty project for an image
    New {
        image: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the image path and a line per shape
    Info { project: PathBuf },

    /// Print the project as JSON, move handles included
    Dump { project: PathBuf },

    /// Append a shape and save the project in place
    Add {
        project: PathBuf,
        #[command(subcommand)]
        shape: ShapeArgs,
    },

    /// Delete the shape at an index and save the project in place
    Remove { project: PathBuf, index: usize },
}

#[derive(Subcommand, Debug)]
enum ShapeArgs {
    Circle {
        #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
        at: Vec2,
        #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
        size: Vec2,
        #[arg(long, value_parser = parse_color, default_value = "0,0,0")]
        color: Color,
    },
    Rectangle {
        #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
        at: Vec2,
        #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
        size: Vec2,
        #[arg(long, value_parser = parse_color, default_value = "0,0,0")]
        color: Color,
    },
    Polygon {
        /// Boundary point, in drawing order; repeat for each vertex
        #[arg(long = "vertex", value_parser = parse_vec2, allow_hyphen_values = true, required = true)]
        vertices: Vec<Vec2>,
        #[arg(long, value_parser = parse_color, default_value = "0,0,0")]
        color: Color,
    },
}

impl ShapeArgs {
    fn into_shape(self) -> Shape {
        match self {
            ShapeArgs::Circle { at, size, color } => Shape::circle(at, size, color),
            ShapeArgs::Rectangle { at, size, color } => Shape::rectangle(at, size, color),
            ShapeArgs::Polygon { vertices, color } => Shape::polygon(vertices, color),
        }
    }
}

fn parse_ints<const N: usize>(s: &str) -> std::result::Result<[i32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma separated integers, got `{s}`"));
    }
    let mut out = [0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("`{part}` is not an integer: {e}"))?;
    }
    Ok(out)
}

fn parse_vec2(s: &str) -> std::result::Result<Vec2, String> {
    let [x, y] = parse_ints::<2>(s)?;
    Ok(Vec2::new(x, y))
}

fn parse_color(s: &str) -> std::result::Result<Color, String> {
    let [r, g, b] = parse_ints::<3>(s)?;
    Ok(Color::rgb(r, g, b))
}

// ── Commands ────────────────────────────────────────────────────────────────

fn run(command: Command) -> Result<()> {
    match command {
        Command::New { image, output } => {
            if !image.exists() {
                return Err(Error::ImageNotFound(image));
            }
            let image_path = image
                .to_str()
                .ok_or_else(|| Error::ImagePathNotUtf8(image.clone()))?;
            EditorSession::new(image_path).save(&output)?;
            println!("created {}", output.display());
        }
        Command::Info { project } => {
            let session = EditorSession::open(&project)?;
            println!("image: {}", session.image_path());
            println!("shapes: {}", session.shapes().len());
            for (i, shape) in session.shapes().iter().enumerate() {
                println!("  {i:>3} {}", describe(shape));
            }
        }
        Command::Dump { project } => {
            let session = EditorSession::open(&project)?;
            println!("{}", serde_json::to_string_pretty(&session.to_project())?);
        }
        Command::Add { project, shape } => {
            let mut session = EditorSession::open(&project)?;
            let index = session.add_shape(shape.into_shape());
            session.save(&project)?;
            debug!("added shape {index}");
            println!("added shape {index}");
        }
        Command::Remove { project, index } => {
            let mut session = EditorSession::open(&project)?;
            let len = session.shapes().len();
            let Some(removed) = session.delete_shape(index) else {
                return Err(Error::NoSuchShape { index, len });
            };
            session.save(&project)?;
            println!("removed {} {index}", removed.kind.name());
        }
    }
    Ok(())
}

fn describe(shape: &Shape) -> String {
    let Color { r, g, b } = shape.color;
    let Vec2 { x, y } = shape.position;
    if shape.is_polygon() {
        format!(
            "{} at ({x}, {y}) with {} vertices, color ({r}, {g}, {b})",
            shape.kind.name(),
            shape.vertices.len()
        )
    } else {
        format!(
            "{} at ({x}, {y}) size ({}, {}), color ({r}, {g}, {b})",
            shape.kind.name(),
            shape.size.x,
            shape.size.y
        )
    }
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    logging::init(&Config::from_env().verbose(cli.verbose));

    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
