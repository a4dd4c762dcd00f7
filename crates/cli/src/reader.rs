//! Reader listing helpers

use cardwatch_transport_pcsc::{PcscDeviceManager, PcscError};

/// List all available readers with their card status
pub fn list_readers(manager: &PcscDeviceManager) -> Result<(), Box<dyn std::error::Error>> {
    let readers = match manager.list_readers() {
        Ok(readers) => readers,
        Err(PcscError::NoReadersAvailable) => {
            println!("No readers found!");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Available readers:");
    for (i, reader) in readers.iter().enumerate() {
        let status = if reader.has_card() {
            "card present"
        } else {
            "no card"
        };
        println!("{}. {} ({})", i + 1, reader.name(), status);
    }

    Ok(())
}
