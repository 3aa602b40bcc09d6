//! Scheduler hospedado para os testes.
//!
//! Implementa o contrato [`Scheduler`] sobre threads do `std`: cada
//! thread registrada ganha um "permit" (Mutex + Condvar). `wake` deposita
//! o permit; `sleep_and_release` o consome, de modo que um wake entre o
//! release do spinlock e o bloqueio efetivo nunca se perde.

use super::{Scheduler, ThreadId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex as StdMutex};

struct Parker {
    permit: StdMutex<bool>,
    cv: Condvar,
}

impl Parker {
    fn new() -> Self {
        Self {
            permit: StdMutex::new(false),
            cv: Condvar::new(),
        }
    }
}

/// Scheduler de teste baseado em parking de threads do host.
pub struct HostScheduler {
    next_id: AtomicU32,
    parkers: StdMutex<HashMap<ThreadId, Arc<Parker>>>,
    by_host: StdMutex<HashMap<std::thread::ThreadId, ThreadId>>,
}

impl HostScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU32::new(1),
            parkers: StdMutex::new(HashMap::new()),
            by_host: StdMutex::new(HashMap::new()),
        })
    }

    /// Registra a thread atual (idempotente) e devolve sua identidade.
    pub fn register(&self) -> ThreadId {
        let host = std::thread::current().id();
        let mut by_host = self.by_host.lock().unwrap();
        if let Some(&id) = by_host.get(&host) {
            return id;
        }
        let id = ThreadId(self.next_id.fetch_add(1, Ordering::Relaxed));
        by_host.insert(host, id);
        self.parkers
            .lock()
            .unwrap()
            .insert(id, Arc::new(Parker::new()));
        id
    }

    fn parker_of(&self, id: ThreadId) -> Arc<Parker> {
        self.parkers
            .lock()
            .unwrap()
            .get(&id)
            .expect("thread não registrada no HostScheduler")
            .clone()
    }
}

impl Scheduler for HostScheduler {
    fn current_thread(&self) -> ThreadId {
        self.register()
    }

    fn sleep_and_release(&self, release: &mut dyn FnMut()) {
        let me = self.register();
        let parker = self.parker_of(me);
        // Intenção de dormir registrada (parker existe e será consultada
        // pelo wake) ANTES de soltar o lock do chamador.
        release();
        let mut permit = parker.permit.lock().unwrap();
        while !*permit {
            permit = parker.cv.wait(permit).unwrap();
        }
        *permit = false;
    }

    fn wake(&self, thread: ThreadId) {
        let parker = self.parker_of(thread);
        let mut permit = parker.permit.lock().unwrap();
        *permit = true;
        parker.cv.notify_one();
    }

    fn yield_now(&self) {
        std::thread::yield_now();
    }
}
