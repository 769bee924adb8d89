// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line options

use anyhow::{anyhow, bail, Context, Result};
use roomor_layout::config::DEFAULT_PLACEABLE_SIZE;
use roomor_layout::{EntityKind, RoomConfig, SessionId};
use roomor_occupancy::GridSpec;
use std::fs;
use std::str::FromStr;

/// Parsed `roomgen` invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub config: RoomConfig,
    pub grid: GridSpec,
    pub session: SessionId,
    /// Redraw targets (and keys) once after generation
    pub reposition: bool,
    /// Rasterize the raw-obstacle view instead of the zone view
    pub freezone: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: RoomConfig::cube_room(),
            grid: GridSpec::default(),
            session: SessionId(0),
            reposition: false,
            freezone: false,
        }
    }
}

impl Options {
    /// Parse arguments (without the program name); `None` means help was asked for
    pub fn parse<I>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter();

        // Overrides apply on top of --config regardless of flag order
        let mut seed = None;
        let mut obstacles = None;
        let mut keys = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => return Ok(None),
                "--config" => {
                    let path = value(&mut args, &arg)?;
                    let json = fs::read_to_string(&path)
                        .with_context(|| format!("Cannot read config '{}'", path))?;
                    options.config = RoomConfig::from_json(&json)
                        .with_context(|| format!("Cannot parse config '{}'", path))?;
                }
                "--seed" => seed = Some(parse(&mut args, &arg)?),
                "--obstacles" => obstacles = Some(parse(&mut args, &arg)?),
                "--keys" => keys = true,
                "--session" => options.session = SessionId(parse(&mut args, &arg)?),
                "--grid" => options.grid.size = parse(&mut args, &arg)?,
                "--resolution" => options.grid.resolution = parse(&mut args, &arg)?,
                "--reposition" => options.reposition = true,
                "--freezone" => options.freezone = true,
                other => bail!("Unknown option: {}", other),
            }
        }

        if let Some(seed) = seed {
            options.config.seed = Some(seed);
        }
        if let Some(count) = obstacles {
            options.config.obstacle_count = count;
        }
        if keys && options.config.placeable(EntityKind::Key).is_none() {
            options.config = options.config.with_key(DEFAULT_PLACEABLE_SIZE);
        }

        options.config.validate()?;
        options.grid.validate()?;
        Ok(Some(options))
    }
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next().ok_or_else(|| anyhow!("Missing value for {}", flag))
}

fn parse<T, I>(args: &mut I, flag: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    I: Iterator<Item = String>,
{
    let raw = value(args, flag)?;
    raw.parse()
        .with_context(|| format!("Invalid value '{}' for {}", raw, flag))
}

pub fn print_usage() {
    eprintln!("roomgen - procedural room generator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  roomgen [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>       Room config as JSON (defaults: cube room)");
    eprintln!("  --seed <n>            RNG seed for reproducible rooms");
    eprintln!("  --obstacles <n>       Number of obstacles (default: 10)");
    eprintln!("  --keys                Also place one key per zone (chest room)");
    eprintln!("  --session <n>         Session id used in entity names (default: 0)");
    eprintln!("  --grid <n>            Occupancy grid cells per side (default: 512)");
    eprintln!("  --resolution <m>      Occupancy grid cell size (default: 0.05)");
    eprintln!("  --reposition          Redraw targets and keys once after generating");
    eprintln!("  --freezone            Rasterize raw obstacle footprints instead of zones");
    eprintln!("  --help                Show this message");
    eprintln!();
    eprintln!("The result is printed to stdout as JSON; logs go to stderr (RUST_LOG).");
}
