//! Minimal embedding example for agh-core
//!
//! This example demonstrates using agh-core as a library in a custom
//! application, driving the reconciler against the in-memory store. No
//! AdGuard Home instance is needed; swap in `HttpRewriteStore` from
//! agh-store-http to talk to a real appliance.

use agh_core::{DesiredRewrite, MemoryRewriteStore, Presence, Reconciler, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    println!("=== Embedded agh-core Example ===\n");

    let store = MemoryRewriteStore::new();
    let reconciler = Reconciler::new_live(Box::new(store.clone()));

    println!("1. Creating a rewrite...");
    let desired = DesiredRewrite::new("nas.home.lan").with_answer("192.168.1.50");
    let report = reconciler.reconcile(&desired).await?;
    println!("   changed={} message={:?}\n", report.changed, report.message);

    println!("2. Reconciling the same state again (converged, no change)...");
    let report = reconciler.reconcile(&desired).await?;
    println!("   changed={} message={:?}\n", report.changed, report.message);

    println!("3. Changing the answer (delete + create under the hood)...");
    let desired = DesiredRewrite::new("nas.home.lan").with_answer("192.168.1.60");
    let report = reconciler.reconcile(&desired).await?;
    println!("{}\n", report.to_json()?);

    println!("4. Removing the rewrite...");
    let desired = DesiredRewrite::new("nas.home.lan").with_presence(Presence::Absent);
    let report = reconciler.reconcile(&desired).await?;
    println!("   changed={} message={:?}\n", report.changed, report.message);

    println!("Store now holds {} rule(s)", store.len().await);

    println!("\n=== Reconcile Successful ===");
    println!("Key Points:");
    println!("- The reconciler holds a trait object, any rewrite store works");
    println!("- Runs are stateless: every call lists fresh appliance state");
    println!("- Dry-run planning is available via Reconciler::new_dry_run");

    Ok(())
}
