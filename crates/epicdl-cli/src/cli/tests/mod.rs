//! CLI parse tests.

use super::{Cli, CliCommand, CollectionArg, FormatArg};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}
