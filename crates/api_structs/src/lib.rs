mod statement;
mod status;

pub mod dtos {
    pub use crate::statement::dtos::*;
}

pub use crate::statement::api::*;
pub use crate::status::api::*;
