//! Mutex - lock bloqueante integrado ao scheduler
//!
//! # Diferença do Spinlock
//!
//! - Mutex PODE dormir (chama o scheduler)
//! - Spinlock NÃO pode dormir (busy-wait)
//!
//! Quando uma thread não consegue o lock de primeira, ela entra na fila
//! de sleepers e dorme via `Scheduler::sleep_and_release`; quem solta o
//! lock acorda o PRIMEIRO da fila (ordem estrita de chegada). A thread
//! acordada NÃO assume que é dona do mutex: ela re-disputa o flag, porque
//! o protocolo só garante que o mutex estava livre no momento do sinal.
//!
//! Um `lock()` reentrante pela própria dona trava para sempre — isso é
//! documentado, não prevenido.

use alloc::collections::VecDeque;
use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

use crate::sched::{SchedulerRef, ThreadId};
use crate::sync::spinlock::Spinlock;

/// Metadados do mutex, protegidos pelo spinlock interno.
///
/// O spinlock aqui não pode bloquear: ele é tomado em caminhos adjacentes
/// ao scheduler, onde dormir causaria deadlock.
struct MutexState {
    locked: bool,
    held_by: Option<ThreadId>,
    sleepers: VecDeque<ThreadId>,
}

/// Mutex bloqueante com fila FIFO de espera.
pub struct Mutex<T> {
    state: Spinlock<MutexState>,
    sched: SchedulerRef,
    data: UnsafeCell<T>,
}

// SAFETY: Mutex protege acesso com lock
unsafe impl<T: Send> Send for Mutex<T> {}
unsafe impl<T: Send> Sync for Mutex<T> {}

impl<T> Mutex<T> {
    pub fn new(data: T, sched: SchedulerRef) -> Self {
        Self {
            state: Spinlock::new(MutexState {
                locked: false,
                held_by: None,
                sleepers: VecDeque::new(),
            }),
            sched,
            data: UnsafeCell::new(data),
        }
    }

    /// Adquire o lock (pode bloquear).
    pub fn lock(&self) -> MutexGuard<'_, T> {
        let me = self.sched.current_thread();
        let mut state = self.state.lock();
        while state.locked {
            // Double-sleep é erro de lógica fatal: indica que alguém usou
            // Scheduler::wake por fora com uma thread dormindo neste mutex.
            assert!(
                !state.sleepers.contains(&me),
                "Mutex::lock: thread {} já está na fila de sleepers",
                me
            );
            state.sleepers.push_back(me);
            // Solta o spinlock e dorme em um passo atômico; qualquer wake
            // entre o release e o bloqueio fica retido pelo scheduler.
            let mut guard_cell = Some(state);
            self.sched.sleep_and_release(&mut || {
                guard_cell.take();
            });
            // Acordou: re-disputa o flag.
            state = self.state.lock();
        }
        state.locked = true;
        state.held_by = Some(me);
        drop(state);
        MutexGuard { lock: self }
    }

    /// Tenta adquirir sem bloquear; nunca entra na fila.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        let me = self.sched.current_thread();
        let mut state = self.state.lock();
        if state.locked {
            return None;
        }
        state.locked = true;
        state.held_by = Some(me);
        drop(state);
        Some(MutexGuard { lock: self })
    }

    fn unlock(&self) {
        let mut state = self.state.lock();
        state.locked = false;
        state.held_by = None;
        if let Some(next) = state.sleepers.pop_front() {
            self.sched.wake(next);
        }
    }

    /// Diagnóstico: o mutex está livre neste instante?
    ///
    /// Com o scheduler ativo o resultado já nasce obsoleto — não use para
    /// decidir nada; use `lock()`.
    pub fn is_free(&self) -> bool {
        let state = self.state.lock();
        !state.locked
    }

    /// Identidade da thread dona, se houver.
    pub fn held_by(&self) -> Option<ThreadId> {
        self.state.lock().held_by
    }

    #[cfg(test)]
    pub(crate) fn sleepers_len(&self) -> usize {
        self.state.lock().sleepers.len()
    }
}

/// Guard do mutex - libera (e acorda o próximo da fila) ao sair do escopo.
pub struct MutexGuard<'a, T> {
    lock: &'a Mutex<T>,
}

impl<T> Deref for MutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: Lock está adquirido
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: Lock está adquirido
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::testing::HostScheduler;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_exclusao_mutua() {
        let sched: SchedulerRef = HostScheduler::new();
        let mutex = Arc::new(Mutex::new(0u64, sched));
        let mut handles = Vec::new();
        for _ in 0..6 {
            let mutex = mutex.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..500 {
                    let mut g = mutex.lock();
                    let v = *g;
                    std::thread::yield_now();
                    *g = v + 1;
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*mutex.lock(), 3000);
    }

    #[test]
    fn test_try_lock_nao_enfileira() {
        let sched: SchedulerRef = HostScheduler::new();
        let mutex = Arc::new(Mutex::new((), sched));
        let g = mutex.lock();
        assert!(mutex.try_lock().is_none());
        assert_eq!(mutex.sleepers_len(), 0);
        drop(g);
        assert!(mutex.try_lock().is_some());
    }

    #[test]
    fn test_held_by_e_is_free() {
        let sched = HostScheduler::new();
        let me = sched.register();
        let sref: SchedulerRef = sched;
        let mutex = Mutex::new((), sref);
        assert!(mutex.is_free());
        let g = mutex.lock();
        assert_eq!(mutex.held_by(), Some(me));
        assert!(!mutex.is_free());
        drop(g);
        assert!(mutex.is_free());
    }

    #[test]
    fn test_fifo_ordem_de_chegada() {
        let sched: SchedulerRef = HostScheduler::new();
        let mutex = Arc::new(Mutex::new(Vec::<u32>::new(), sched));

        let g = mutex.lock();

        let mut handles = Vec::new();
        for idx in 1..=3u32 {
            let worker = mutex.clone();
            handles.push(std::thread::spawn(move || {
                worker.lock().push(idx);
            }));
            // Espera a thread idx entrar na fila antes de lançar a próxima,
            // para a ordem de chegada ser determinística.
            while mutex.sleepers_len() < idx as usize {
                std::thread::sleep(Duration::from_millis(1));
            }
        }

        drop(g);
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*mutex.lock(), vec![1, 2, 3]);
    }
}
