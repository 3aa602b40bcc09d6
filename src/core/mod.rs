//! Core Module
//!
//! Contém a infraestrutura transversal do substrato, independente de
//! arquitetura: o sistema de logging.

pub mod logging;
