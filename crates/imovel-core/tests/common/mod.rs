#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use imovel_core::{
    Address, AddressLookup, AutosaveConfig, CaracteristicaEscopo, Completeness, OptionItem,
    PropertyApi, PropertyId, SessionCache, StepId, StepPayload, Wizard, WizardBuilder,
    WizardError,
};
use serde_json::Value;
use tokio::time::Instant;

/// One request received by the mock backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(StepId),
    Put(StepId, Value),
    Completeness,
    Activate,
    Caracteristicas(CaracteristicaEscopo),
    Proximidades,
    Usuarios,
}

/// Recording backend with configurable data, latency and failures.
#[derive(Default)]
pub struct MockApi {
    stored: Mutex<HashMap<StepId, StepPayload>>,
    report: Mutex<Option<BTreeMap<String, bool>>>,
    options: Mutex<Vec<OptionItem>>,
    calls: Mutex<Vec<(Instant, Call)>>,
    get_delay: Mutex<Duration>,
    put_delay: Mutex<Duration>,
    pub fail_puts: AtomicBool,
    pub fail_gets: AtomicBool,
    pub fail_activate: AtomicBool,
    pub fail_options: AtomicBool,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(self, step: StepId, payload: Value) -> Self {
        let payload = StepPayload::try_from(payload).expect("step payload must be an object");
        self.stored.lock().unwrap().insert(step, payload);
        self
    }

    pub fn with_completeness(self, report: &[(&str, bool)]) -> Self {
        let report = report
            .iter()
            .map(|(name, done)| (name.to_string(), *done))
            .collect();
        *self.report.lock().unwrap() = Some(report);
        self
    }

    pub fn with_options(self, options: &[(u64, &str)]) -> Self {
        *self.options.lock().unwrap() = options
            .iter()
            .map(|(id, nome)| OptionItem {
                id: *id,
                nome: nome.to_string(),
            })
            .collect();
        self
    }

    pub fn with_get_delay(self, delay: Duration) -> Self {
        *self.get_delay.lock().unwrap() = delay;
        self
    }

    pub fn with_put_delay(self, delay: Duration) -> Self {
        *self.put_delay.lock().unwrap() = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, Call)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn gets(&self, step: StepId) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == Call::Get(step))
            .count()
    }

    pub fn puts(&self) -> Vec<(StepId, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Put(step, body) => Some((step, body)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls().iter().filter(|call| *call == wanted).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }

    fn failure(message: &str) -> WizardError {
        WizardError::Api {
            status: 500,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl PropertyApi for MockApi {
    async fn get_step(
        &self,
        _id: PropertyId,
        step: StepId,
    ) -> imovel_core::Result<Option<StepPayload>> {
        self.record(Call::Get(step));
        let delay = *self.get_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(Self::failure("network down"));
        }
        Ok(self.stored.lock().unwrap().get(&step).cloned())
    }

    async fn update_step(
        &self,
        _id: PropertyId,
        step: StepId,
        body: &StepPayload,
    ) -> imovel_core::Result<StepPayload> {
        self.record(Call::Put(step, serde_json::to_value(body)?));
        let delay = *self.put_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(Self::failure("save rejected"));
        }
        // Echo something different from the request to prove it is ignored.
        Ok(StepPayload::new())
    }

    async fn completeness(&self, _id: PropertyId) -> imovel_core::Result<Completeness> {
        self.record(Call::Completeness);
        match self.report.lock().unwrap().clone() {
            Some(report) => Ok(Completeness::from_wire(report)),
            None => Err(Self::failure("completude indisponível")),
        }
    }

    async fn activate(&self, _id: PropertyId) -> imovel_core::Result<()> {
        self.record(Call::Activate);
        if self.fail_activate.load(Ordering::SeqCst) {
            return Err(Self::failure("activation rejected"));
        }
        Ok(())
    }

    async fn caracteristicas(
        &self,
        escopo: CaracteristicaEscopo,
    ) -> imovel_core::Result<Vec<OptionItem>> {
        self.record(Call::Caracteristicas(escopo));
        self.option_list()
    }

    async fn proximidades(&self) -> imovel_core::Result<Vec<OptionItem>> {
        self.record(Call::Proximidades);
        self.option_list()
    }

    async fn usuarios(&self) -> imovel_core::Result<Vec<OptionItem>> {
        self.record(Call::Usuarios);
        self.option_list()
    }
}

impl MockApi {
    fn option_list(&self) -> imovel_core::Result<Vec<OptionItem>> {
        if self.fail_options.load(Ordering::SeqCst) {
            return Err(Self::failure("options unavailable"));
        }
        Ok(self.options.lock().unwrap().clone())
    }
}

/// CEP lookup answering from a fixed table.
#[derive(Default)]
pub struct MockLookup {
    pub known: HashMap<String, Address>,
}

impl MockLookup {
    pub fn with_address(mut self, cep: &str, address: Address) -> Self {
        self.known.insert(cep.to_string(), address);
        self
    }
}

#[async_trait]
impl AddressLookup for MockLookup {
    async fn lookup(&self, cep: &str) -> imovel_core::Result<Address> {
        self.known
            .get(cep)
            .cloned()
            .ok_or_else(|| WizardError::AddressNotFound {
                cep: cep.to_string(),
            })
    }
}

/// Opens a wizard for property 42 on `api` with default autosave delays.
pub async fn open_wizard(api: &Arc<MockApi>) -> Wizard {
    open_wizard_with_cache(api, SessionCache::new()).await
}

pub async fn open_wizard_with_cache(api: &Arc<MockApi>, cache: SessionCache) -> Wizard {
    WizardBuilder::new(42)
        .with_api(Arc::clone(api) as Arc<dyn PropertyApi>)
        .with_cache(cache)
        .with_autosave(AutosaveConfig::default())
        .open()
        .await
        .expect("Failed to open wizard")
}

/// Lets spawned tasks run without advancing the paused clock.
pub async fn run_pending_tasks() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
