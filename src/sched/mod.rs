//! # Scheduler Subsystem
//!
//! O substrato não implementa o scheduler em si: ele CONSOME um contrato
//! de scheduler (sleep/wake/yield) através do trait [`Scheduler`], passado
//! como objeto de contexto explícito (`Arc<dyn Scheduler>`) para todo
//! subsistema que precisa dormir ou ceder a CPU.
//!
//! ## Modelo de concorrência
//!
//! Multithreading cooperativo-preemptivo com um único scheduler; não há
//! paralelismo real assumido no design. Os pontos de suspensão são:
//! `Mutex::lock()` sob contenção (thread enfileirada e descadastrada) e
//! `PageManager::alloc_ppn()` sem frame livre (yield e rescan).

pub mod exec;

#[cfg(test)]
pub mod testing;

use alloc::sync::Arc;

/// Identidade opaca de uma thread do kernel.
///
/// O substrato nunca é dono de threads — só guarda a identidade para
/// contabilidade de locks (held_by, fila de sleepers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadId(pub u32);

impl core::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Contrato do scheduler consumido pelo Mutex e pelo PageManager.
///
/// # Contrato de `sleep_and_release`
///
/// A implementação DEVE registrar a intenção de dormir da thread atual
/// ANTES de invocar `release` (que derruba o guard do spinlock do
/// chamador), e um [`Scheduler::wake`] que chegue entre o `release` e o
/// bloqueio efetivo não pode ser perdido (semântica de permit). Este é o
/// único ponto do protocolo em que a atomicidade
/// enqueue-and-deschedule é requisito de corretude, não otimização.
pub trait Scheduler: Send + Sync {
    /// Identidade da thread em execução.
    fn current_thread(&self) -> ThreadId;

    /// Descadastra a thread atual e solta o lock do chamador, atomicamente.
    ///
    /// `release` dropa o guard do spinlock que protege a fila de espera.
    /// Retorna apenas quando a thread for acordada por [`Scheduler::wake`].
    fn sleep_and_release(&self, release: &mut dyn FnMut());

    /// Acorda uma thread que dorme via `sleep_and_release`.
    ///
    /// No máximo um wake por sleep; acordar uma thread que dorme em um
    /// mutex por fora do protocolo do mutex é erro de lógica fatal
    /// (detectado pelo assert de double-sleep no Mutex).
    fn wake(&self, thread: ThreadId);

    /// Cede a CPU voluntariamente (usado no retry do alocador de páginas).
    fn yield_now(&self);
}

/// Handle compartilhado do scheduler.
pub type SchedulerRef = Arc<dyn Scheduler>;
