//! Rust code generation modules.

pub mod complex_keys;
pub mod enums;
pub mod fields;
pub mod records;
pub mod typerefs;
pub mod unions;

pub use complex_keys::ComplexKeyGenerator;
pub use enums::EnumGenerator;
pub use fields::TypeRenderer;
pub use records::RecordGenerator;
pub use typerefs::TyperefGenerator;
pub use unions::UnionGenerator;
