use std::path::PathBuf;

use backlight::{BacklightConfig, BacklightError, BacklightManager, BacklightManagerBuilder};

use clap::{Parser, Subcommand};

/// Query and set the brightness of kernel backlight devices
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Regular expression for the devices to match
    #[arg(long, value_name = "regex", default_value_t = String::from("."))]
    device: String,

    /// Where sysfs is mounted, overrides the config file
    #[arg(long, value_name = "path")]
    sysfs_root: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Action {
    /// Print the syspath of each backlight device.
    List,

    /// Print the syspath of the first device whose type is `firmware`, `platform` or `raw`.
    Find {
        #[arg(value_name = "type")]
        device_type: String,
    },

    /// Print the brightness of a device.
    /// Without a syspath the preferred device is used.
    Get {
        /// Print the maximum brightness instead
        #[arg(long)]
        max: bool,

        syspath: Option<PathBuf>,
    },

    /// Set the brightness of a device, clamped to its maximum.
    /// Without a syspath the preferred device is used.
    Set {
        #[arg(allow_negative_numbers = true)]
        value: i32,

        syspath: Option<PathBuf>,
    },
}

fn resolve(
    manager: &mut BacklightManager,
    syspath: Option<PathBuf>,
) -> Result<PathBuf, BacklightError> {
    match syspath {
        Some(syspath) => Ok(syspath),
        None => manager
            .find_preferred_device_path()?
            .ok_or(BacklightError::NoDevices),
    }
}

fn run(manager: &mut BacklightManager, action: Action) -> Result<(), BacklightError> {
    match action {
        Action::List => {
            for syspath in manager.list_device_paths()? {
                println!("{}", syspath.display());
            }
        }
        Action::Find { device_type } => match manager.find_device_path_by_type(&device_type)? {
            Some(syspath) => println!("{}", syspath.display()),
            None => return Err(BacklightError::NoDevices),
        },
        Action::Get { max, syspath } => {
            let syspath = resolve(manager, syspath)?;
            let brightness = if max {
                manager.get_max_brightness(&syspath)?
            } else {
                manager.get_brightness(&syspath)?
            };
            println!("{brightness}");
        }
        Action::Set { value, syspath } => {
            let syspath = resolve(manager, syspath)?;
            let written = manager.set_brightness(&syspath, value)?;
            log::debug!("{} set to {written}", syspath.display());
        }
    }
    Ok(())
}

fn main() -> Result<(), BacklightError> {
    env_logger::init();
    let args = Args::parse();

    let mut config = BacklightConfig::new()?;
    if let Some(sysfs_root) = args.sysfs_root {
        config.sysfs_root = sysfs_root;
    }

    let mut manager = BacklightManagerBuilder::new()
        .with_device_regex(args.device.as_str())
        .with_config(config)
        .build()?;
    manager.initialize()?;

    let result = run(&mut manager, args.action);
    manager.finalize();
    result
}
