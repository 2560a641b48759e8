//! Embedded file templates. Placeholders use `{{key}}`; single braces
//! belong to the generated Python and are left alone.

pub mod project;
pub mod scaffold;
