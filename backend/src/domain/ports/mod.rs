//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Catalogue`) are called by inbound adapters.
//! Driven ports (`*Repository`, [`ImageStore`]) are implemented by outbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod image_store;
mod label_catalogue;
mod label_repository;
mod recipe_catalogue;
mod recipe_repository;
mod token_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, NewAccount, ProfileUpdate};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use label_catalogue::MockLabelCatalogue;
pub use label_catalogue::LabelCatalogue;
#[cfg(test)]
pub use label_repository::MockLabelRepository;
pub use label_repository::{LabelPersistenceError, LabelRepository};
#[cfg(test)]
pub use recipe_catalogue::MockRecipeCatalogue;
pub use recipe_catalogue::{ImageUpload, RecipeCatalogue};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipePersistenceError, RecipeRepository};
#[cfg(test)]
pub use token_repository::MockTokenRepository;
pub use token_repository::{TokenPersistenceError, TokenRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
