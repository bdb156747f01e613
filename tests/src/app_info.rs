// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Application info tests

use log::info;

use ledger_neo::{DeviceHandle, Exchange};

/// Expected application name
pub const APP_NAME: &str = "NEO3";

/// Fetch application name and version, checking both request forms agree
pub async fn test<T>(t: T) -> anyhow::Result<()>
where
    T: Exchange + Send,
{
    let d = DeviceHandle::from(t);

    let name = d.app_name().await?;
    info!("app name: {}", name);
    assert_eq!(name, APP_NAME);

    let version = d.version().await?;
    info!("app version: {}", version);

    let app = d.app_and_version().await?;
    info!("app and version: {:?}", app);

    assert_eq!(app.name, APP_NAME);
    assert_eq!(app.version, version.to_string());

    Ok(())
}
