pub mod dialect;
pub mod regions;
pub mod scanner;

pub use dialect::Dialect;
pub use scanner::SymbolScanner;
