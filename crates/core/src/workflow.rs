//! Query, parse, select and act: the steps a command handler strings together.

use std::io::{BufRead, Write};

use log::{debug, info};

use crate::error::Result;
use crate::host_definitions::HostDefinition;
use crate::operations::HostQuery;
use crate::remote::RemoteExecutor;
use crate::selection::{SelectionState, Selector};
use crate::table::{ParsedTable, TableParser};

/// Runs a read-only query and returns its trimmed stdout.
///
/// # Errors
///
/// Returns any error from the executor.
pub fn run_query<E: RemoteExecutor + ?Sized>(
    executor: &E,
    host: &HostDefinition,
    query: HostQuery,
) -> Result<String> {
    let output = executor.run(host, &query.command())?;
    Ok(output.stdout_trimmed().to_string())
}

/// Fetches the VM listing and parses it.
///
/// # Errors
///
/// Returns any error from the executor, or [`Error::Format`](crate::error::Error::Format)
/// if the listing is too short to be a table.
pub fn fetch_vm_table<E: RemoteExecutor + ?Sized>(
    executor: &E,
    host: &HostDefinition,
    parser: &TableParser,
) -> Result<ParsedTable> {
    let raw_text = run_query(executor, host, HostQuery::VmListing)?;
    parser.parse(&raw_text)
}

/// Fetches the VM listing once, shows it, and asks the operator which VM to use.
///
/// The returned name always comes from the table that was shown.
///
/// # Errors
///
/// Returns any error from fetching, parsing or selecting.
pub fn choose_vm<E, R, W>(
    executor: &E,
    host: &HostDefinition,
    parser: &TableParser,
    selector: &Selector,
    input: &mut R,
    output: &mut W,
) -> Result<String>
where
    E: RemoteExecutor + ?Sized,
    R: BufRead,
    W: Write,
{
    debug!("Selection state: {}", SelectionState::AwaitingQuery);
    let table = fetch_vm_table(executor, host, parser)?;
    selector.select(&table, input, output)
}

/// Runs a command built from a [`VmAction`](crate::operations::VmAction) or a
/// [`HostPower`](crate::operations::HostPower) and returns the trimmed stdout.
///
/// The caller builds the command once and uses the same string for dry runs.
///
/// # Errors
///
/// Returns any error from the executor.
pub fn run_command<E: RemoteExecutor + ?Sized>(
    executor: &E,
    host: &HostDefinition,
    command: &str,
) -> Result<String> {
    info!("Running `{command}` on {host}");

    let output = executor.run(host, command)?;
    Ok(output.stdout_trimmed().to_string())
}
