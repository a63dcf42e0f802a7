/// Interfaces Layer - External Entry Points
///
/// This layer contains the external interfaces of the service. The HTTP
/// surface lives in `infrastructure::observability`; this layer wires it
/// up from the command line.
///
/// ## Modules
/// - `cli`: Command-line interface (main.rs logic)

pub mod cli;
