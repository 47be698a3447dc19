pub mod prices;

pub use prices::FilesystemPriceRepository;
