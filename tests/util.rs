//! Shared test utilities for integration tests
//!
//! Provides report fixtures and a handle on the compiled binary.

#![allow(dead_code)]

use assert_cmd::Command;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;

/// The five-row bike report: overlapping queries, a tie on 300
/// impressions, and a stopword to strip.
pub const BIKES_CSV: &str = "searchTerm,impressions,adGroupName,campaignName\n\
                             the new blue bike,300,blue bikes,campaign name\n\
                             new bike,200,yellow bikes,campaign name\n\
                             new bike,100,blue bikes,campaign name\n\
                             red bike,10,red bike,campaign name\n\
                             bike,300,blue bike,campaign name\n";

/// Create a temp dir holding `name` with `contents`
pub fn fixture(
    name: &str,
    contents: &str,
) -> assert_fs::TempDir
{
    // Initialize the temporary working directory
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    // Write the report into the fixture
    tmp.child(name)
        .write_str(contents)
        .expect("write report");

    // Return the prepared directory to the caller
    tmp
}

/// `kwselect` running inside `dir`, quiet and uncoloured
pub fn kwselect(dir: &assert_fs::TempDir) -> Command
{
    let mut cmd = Command::cargo_bin("kwselect").expect("kwselect binary");
    cmd.current_dir(dir.path())
        .env_remove("KWSELECT_LOG")
        .arg("--no-color");
    cmd
}
