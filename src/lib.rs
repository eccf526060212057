/*!
 * # ormext - translatable and uploadable entity behaviors
 *
 * A Rust library adding two behaviors to entities managed by an
 * object-relational mapper.
 *
 * ## Features
 *
 * - Field-level localization through per-locale translation records
 * - Collection-valued translated associations with inverse-side maintenance
 * - Automatic removal of translations whose fields are all empty
 * - Storage key generation for files attached to entities
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `property`: entity model and named property access:
 *   - `property::value`: dynamically typed values and shared collections
 *   - `property::entity`: entity handles and per-class accessor tables
 *   - `property::accessor`: get/set by property name
 * - `translatable`: the translatable behavior:
 *   - `translatable::metadata`: field mappings and relation descriptors
 *   - `translatable::context`: translation context and collaborator traits
 *   - `translatable::helper`: the synchronization engine
 *   - `translatable::repository`: translation lookup through the entity graph
 *   - `translatable::listener`: lifecycle adapter for session events
 * - `uploadable`: upload key generation
 * - `session`: in-memory object manager
 * - `app_config`: configuration management
 * - `locale`: locale code utilities
 * - `errors`: custom error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod locale;
pub mod property;
pub mod session;
pub mod translatable;
pub mod uploadable;

// Re-export main types for easier usage
pub use app_config::ExtensionConfig;
pub use errors::{AccessError, AppError, InputError, MappingError, TranslatableError, UploadableError};
pub use property::{Collection, Entity, EntityRef, PropertyAccessor, PropertyTable, Value};
pub use session::InMemoryObjectManager;
pub use translatable::{ClassTranslationContext, TranslatableListener, TranslationHelper};
pub use uploadable::{EntityKeymaker, Keymaker};
