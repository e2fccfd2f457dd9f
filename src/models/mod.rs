// データモデルモジュール

pub mod expense;
pub mod receipt;
pub mod user;

pub use expense::{ExpenseCategory, ExpenseClaim, ExpenseStatus};
pub use receipt::{ImageMimeType, OptimizedImage, ReceiptImage};
pub use user::{User, UserRole};
