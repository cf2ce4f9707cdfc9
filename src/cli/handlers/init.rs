//! Schema initialization and document import handlers

use std::path::Path;

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::models::CreateFeedbackRequest;
use crate::AnalyticsError;
use crate::Result;

/// Handle schema initialization command
pub async fn handle_init_command(database: &Database, force: bool, drop: bool) -> Result<()> {
    if !force {
        print_warning("This will create the feedback table and its indexes.");
        if drop {
            print_warning("--drop will DELETE every stored feedback document first.");
        } else {
            print_warning("This operation is safe - it uses CREATE IF NOT EXISTS.");
        }
        println!("\nUse --force to proceed.");
        return Ok(());
    }

    let exists = database.is_schema_initialized().await?;
    if exists && !drop {
        print_info(&format!(
            "Table {} already exists, ensuring indexes",
            database.table()
        ));
    }

    if drop {
        print_info(&format!("🗑️  Dropping table {}...", database.table()));
        database.drop_schema().await?;
    }

    print_info(&format!("🗄️  Initializing table {}...", database.table()));
    database.init_schema().await?;
    print_success("Feedback table and indexes ready");
    Ok(())
}

/// Parse a JSON array of feedback objects
pub fn read_import_file(path: &Path) -> Result<Vec<CreateFeedbackRequest>> {
    let content = std::fs::read_to_string(path)?;
    let requests: Vec<CreateFeedbackRequest> = serde_json::from_str(&content)?;
    if let Some(bad) = requests.iter().find(|r| r.service.trim().is_empty()) {
        return Err(AnalyticsError::InvalidInput(format!(
            "feedback from {:?} has no service",
            bad.email
        )));
    }
    Ok(requests)
}

/// Handle document import command
pub async fn handle_import_command(database: &Database, path: &Path) -> Result<()> {
    let requests = read_import_file(path)?;
    print_info(&format!(
        "📥 Importing {} feedback documents from {}",
        requests.len(),
        path.display()
    ));

    let total = requests.len();
    for request in requests {
        database.insert_feedback(&request.into_document()).await?;
    }

    print_success(&format!("Imported {total} feedback documents"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_read_import_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"Ada","email":"ada@example.com","feedback_type":"bug",
                "service":"billing","message":"Refund is late","rating":2,
                "agree_to_terms":true}}]"#
        )
        .unwrap();

        let requests = read_import_file(file.path()).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].service, "billing");
        assert!(!requests[0].attach_screenshot);
    }

    #[test]
    fn test_read_import_file_rejects_missing_service() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"Ada","email":"ada@example.com","feedback_type":"bug",
                "service":" ","message":null,"rating":2,"agree_to_terms":true}}]"#
        )
        .unwrap();

        let err = read_import_file(file.path()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    #[test]
    fn test_read_import_file_rejects_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            read_import_file(file.path()),
            Err(AnalyticsError::Serialization(_))
        ));
    }
}
