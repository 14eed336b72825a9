pub mod franchise_repo;
pub use franchise_repo::FranchiseRepository;
pub mod message_repo;
pub use message_repo::MessageRepository;
pub mod reservation_repo;
pub use reservation_repo::ReservationRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
