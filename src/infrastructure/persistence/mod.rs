pub mod json_model_repository;

pub use json_model_repository::JsonFileModelRepository;
