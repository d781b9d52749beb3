// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that describe the
// problem: a table of page features with a phishing label.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Raw CSV table and the cleaned numeric feature table
pub mod table;

// Label column resolution and binarisation
pub mod label;

// The two checked failures of the training pipeline
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
