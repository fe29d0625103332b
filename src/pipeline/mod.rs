pub mod import;
pub mod extraction;
pub mod vitals; // Blood-pressure split and vitals flattening
pub mod ingest; // Upload → store → extract → persist → reward
