use crate::{
    info,
    management::{PlaylistCounter, created_summary},
};

/// Prints the playlist total. Stays silent when the counter service is
/// unreachable or nothing has been created yet.
pub async fn stats() {
    let count = PlaylistCounter::from_config().count().await;
    if let Some(line) = created_summary(count) {
        info!("{}", line);
    }
}
