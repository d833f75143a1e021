//! # Taskd Infrastructure
//!
//! 仓储抽象的具体实现。当前只有内存实现，进程重启后数据丢失。

pub mod memory_repository;

pub use memory_repository::InMemoryTaskRepository;
