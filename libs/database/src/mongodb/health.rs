use mongodb::Client;

use super::connector::ping;

/// Health check status for MongoDB
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the database is healthy
    pub healthy: bool,
    /// Optional message (e.g., error details)
    pub message: Option<String>,
}

/// Check MongoDB health, keeping the error message of a failed ping.
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    match ping(client).await {
        Ok(()) => HealthStatus {
            healthy: true,
            message: None,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_check_health_detailed() {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let status = check_health_detailed(&client).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
    }
}
