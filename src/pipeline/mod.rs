pub mod module;
pub mod passport_pipeline;
