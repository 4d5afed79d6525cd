pub mod directory;

pub use directory::{GateHandle, StubCall, StubDirectoryServer, StubEndpoint};
