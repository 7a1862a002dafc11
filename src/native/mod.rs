/// Native module contains implementations of core traits that spawn the
/// JDK binaries directly as child processes, without any container layer.
pub mod compiler;
pub mod probe;
pub mod process;
pub mod runner;
pub mod workspace;
