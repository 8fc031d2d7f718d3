pub mod domain;
pub mod memory;
pub mod ports;
pub mod services;

pub use domain::{
    AccessToken, AuthOutcome, Book, BookDraft, BookFilter, BookReadTotal, NewReadingInterval,
    NewUser, PageRequest, Paginated, ReadingInterval, Role, TokenClaims, TopBook, User,
    UserCredentials,
};
pub use memory::InMemoryStore;
pub use ports::{
    BookRepository, PasswordHasher, PortError, PortResult, ReadingIntervalRepository,
    TokenService, UserRepository,
};
