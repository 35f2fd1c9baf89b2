// discfinalize/src/main.rs
mod prompt;

use std::path::PathBuf;

use anyhow::{Context, Error};
use bpaf::*;
use discfinalize::{
    DEFAULT_OUTPUT, Operator, RepairOutcome, SECTOR_SIZE, TopLevelDescriptor, repair_image_file,
};

#[derive(Debug, Clone)]
struct Opts {
    output: PathBuf,
    yes: bool,
    image: PathBuf,
}

/// Set up bpaf argument parsing.
fn opts() -> OptionParser<Opts> {
    let output = short('o')
        .long("output")
        .help("Where to write the finalized image")
        .argument::<PathBuf>("FILE")
        .fallback(PathBuf::from(DEFAULT_OUTPUT));

    let yes = short('y')
        .long("yes")
        .help("Continue without asking if the disc already appears finalized")
        .switch();

    let image = positional::<PathBuf>("IMAGE").help("Disc image to repair");

    construct!(Opts { output, yes, image })
        .to_options()
        .descr("discfinalize: rebuild a finalized image from a non-finalized disc image")
        .version(env!("CARGO_PKG_VERSION"))
}

/// Console side of a repair: reports the descriptor as soon as it is read and
/// asks on the terminal unless `--yes` was given.
struct ConsoleOperator<'a> {
    opts: &'a Opts,
}

impl Operator for ConsoleOperator<'_> {
    fn descriptor_read(&mut self, descriptor: &TopLevelDescriptor) {
        println!(
            "[*] {} contains {} files in metadata",
            self.opts.image.display(),
            descriptor.file_count
        );
        println!("[*] Disc Size: {} Bytes", descriptor.disc_size_bytes());
    }

    fn confirm_finalized(&mut self, _descriptor: &TopLevelDescriptor) -> bool {
        self.opts.yes || prompt::confirm("[*] This disc seems to be finalized. Continue?: ")
    }
}

fn run(opts: &Opts) -> Result<(), Error> {
    let outcome = repair_image_file(&opts.image, &opts.output, ConsoleOperator { opts })
        .with_context(|| format!("could not repair {}", opts.image.display()))?;

    match outcome {
        RepairOutcome::Repaired(report) => {
            println!(
                "[*] Copied {} partition sectors, {} volume info blocks, {} file structure blocks",
                report.partition_sectors, report.volume_info_blocks, report.file_structure_blocks
            );
            println!(
                "[*] Wrote {} ({} byte sectors)",
                opts.output.display(),
                SECTOR_SIZE
            );
        }
        RepairOutcome::Declined(_) => println!("[*] Abort."),
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let opts = opts().run();

    match run(&opts) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("[*] {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("Caused by: {}", cause);
            }
            std::process::exit(1);
        }
    }
}
