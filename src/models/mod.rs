pub mod consultation;
pub mod doctor_note;
pub mod enums;
pub mod file;
pub mod form;
pub mod identity;
pub mod lab_order;
pub mod pharmacist_note;
pub mod recommendation;
pub mod ward;

pub use consultation::*;
pub use enums::*;
pub use doctor_note::*;
pub use file::*;
pub use form::*;
pub use identity::*;
pub use lab_order::*;
pub use pharmacist_note::*;
pub use recommendation::*;
pub use ward::*;
