//! Service layer — composes query building, pagination, and repository calls

pub mod sales;
