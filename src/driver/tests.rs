use super::*;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;

#[derive(Default)]
struct FakeTransport {
    registers: Mutex<HashMap<u16, u16>>,
    writes: Mutex<Vec<(u16, u16)>>,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn read_holding_registers(&self, address: u16, count: u16) -> Result<Vec<u16>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let regs = self.registers.lock().unwrap();
        Ok((address..address + count)
            .map(|a| regs.get(&a).copied().unwrap_or(0))
            .collect())
    }

    async fn write_single_register(&self, address: u16, value: u16) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.writes.lock().unwrap().push((address, value));
        self.registers.lock().unwrap().insert(address, value);
        Ok(())
    }
}

fn driver_with(fake: Arc<FakeTransport>) -> EnovatesDriver {
    let settings = DriverSettings {
        keepalive_interval: Duration::from_secs(3600),
    };
    EnovatesDriver::new(fake, &|| true, settings).unwrap()
}

#[test]
fn decode_status_maps_every_code() {
    assert_eq!(decode_status(0).unwrap(), ChargeStatus::A);
    for raw in 1..=3 {
        assert_eq!(decode_status(raw).unwrap(), ChargeStatus::B);
    }
    assert_eq!(decode_status(4).unwrap(), ChargeStatus::C);
    for raw in [5, 6, 255, 0xFFFF] {
        let err = decode_status(raw).unwrap_err();
        assert!(matches!(err, EnovatesError::ProtocolDecode { raw: r, .. } if r == raw));
    }
}

#[tokio::test]
async fn new_driver_starts_with_minimum_set_point() {
    let fake = Arc::new(FakeTransport::default());
    let d = driver_with(fake.clone());
    assert_eq!(d.set_point_ma(), DEFAULT_SET_POINT_MA);
    assert!(d.keepalive_running());
    assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    d.close().await;
    assert!(!d.keepalive_running());
}

#[tokio::test]
async fn set_max_current_rejects_register_overflow() {
    let fake = Arc::new(FakeTransport::default());
    let d = driver_with(fake.clone());

    d.set_max_current(65).await.unwrap();
    assert_eq!(d.set_point_ma(), 65000);

    let err = d.set_max_current(66).await.unwrap_err();
    assert!(matches!(err, EnovatesError::InvalidArgument { .. }));
    let err = d.set_max_current(i64::MAX).await.unwrap_err();
    assert!(matches!(err, EnovatesError::InvalidArgument { .. }));

    // Failed calls leave the previous set-point and write nothing further
    assert_eq!(d.set_point_ma(), 65000);
    assert_eq!(fake.writes.lock().unwrap().len(), 1);
    d.close().await;
}

#[tokio::test]
async fn enable_uses_stored_set_point() {
    let fake = Arc::new(FakeTransport::default());
    let d = driver_with(fake.clone());

    d.enable(true).await.unwrap();
    assert_eq!(fake.writes.lock().unwrap().last(), Some(&(401, 6000)));
    d.close().await;
}

#[tokio::test]
async fn phases_reads_register_51() {
    let fake = Arc::new(FakeTransport::default());
    fake.registers.lock().unwrap().insert(51, 3);
    let d = driver_with(fake);
    assert_eq!(d.phases().await.unwrap(), 3);
    d.close().await;
}
