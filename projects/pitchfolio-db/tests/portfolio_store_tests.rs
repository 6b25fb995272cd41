use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use pitchfolio_db::{
    AutosaveRequest, Autosaver, Database, PortfolioChanges, PortfolioInput, SessionManager,
    StoreError, AUTOSAVE_NAME,
};
use pitchfolio_engine::roster::InvestmentDetails;
use pitchfolio_engine::{Holding, MarketData, PositionType, Roster, Slot};

fn details(shares: f64, price: f64) -> InvestmentDetails {
    InvestmentDetails {
        share_count: Some(shares),
        purchase_price: Some(price),
        purchase_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        risk_tier: None,
    }
}

/// A small working state built through the engine, snapshotted the way a
/// front end would before saving.
fn sample_snapshot() -> (String, Vec<Holding>) {
    let market = MarketData::from_catalog();
    let mut roster = Roster::new();
    roster
        .assign(&market, Slot::new(PositionType::Defender, 0), "AAPL", details(10.0, 150.0))
        .unwrap();
    roster
        .assign(&market, Slot::new(PositionType::Midfielder, 1), "SPY", details(5.0, 500.0))
        .unwrap();
    roster
        .assign(&market, Slot::new(PositionType::Forward, 0), "TSLA", details(4.0, 250.0))
        .unwrap();
    roster.snapshot()
}

async fn fresh_db_with_user() -> (Arc<Database>, i64) {
    let _ = env_logger::try_init();
    let db = Database::new_in_memory().await.unwrap();
    let user = db.create_user("owner@example.com", "hunter2", "Owner").await.unwrap();
    (Arc::new(db), user.id)
}

#[tokio::test]
async fn save_then_get_round_trips() {
    let (db, user_id) = fresh_db_with_user().await;
    let (formation, holdings) = sample_snapshot();

    let input = PortfolioInput {
        name: "My lineup".to_string(),
        formation: formation.clone(),
        holdings: holdings.clone(),
    };
    let id = db.save_portfolio(user_id, &input).await.unwrap();

    let stored = db.get_portfolio(user_id, id).await.unwrap().expect("portfolio exists");
    assert_eq!(stored.name, "My lineup");
    assert_eq!(stored.formation, formation);
    assert!(!stored.is_autosave);
    assert!(stored.created_at > 0);
    assert_eq!(stored.updated_at, stored.created_at);
    // Holdings survive byte-for-byte as values.
    assert_eq!(
        serde_json::to_value(&stored.holdings).unwrap(),
        serde_json::to_value(&holdings).unwrap()
    );
}

#[tokio::test]
async fn saves_with_the_same_name_are_not_deduplicated() {
    let (db, user_id) = fresh_db_with_user().await;
    let (formation, holdings) = sample_snapshot();

    for _ in 0..2 {
        let input = PortfolioInput {
            name: "Duplicate".to_string(),
            formation: formation.clone(),
            holdings: holdings.clone(),
        };
        db.save_portfolio(user_id, &input).await.unwrap();
    }

    let all = db.list_portfolios(user_id).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn update_merges_fields_and_reports_missing_ids() {
    let (db, user_id) = fresh_db_with_user().await;
    let (formation, holdings) = sample_snapshot();
    let input = PortfolioInput { name: "Before".to_string(), formation, holdings };
    let id = db.save_portfolio(user_id, &input).await.unwrap();

    let renamed = PortfolioChanges { name: Some("After".to_string()), ..Default::default() };
    assert!(db.update_portfolio(user_id, id, &renamed).await.unwrap());

    let stored = db.get_portfolio(user_id, id).await.unwrap().unwrap();
    assert_eq!(stored.name, "After");
    // Unset fields were left alone.
    assert_eq!(stored.holdings.len(), 3);
    assert!(stored.updated_at >= stored.created_at);

    assert!(!db.update_portfolio(user_id, 9999, &PortfolioChanges::default()).await.unwrap());
}

#[tokio::test]
async fn delete_on_missing_id_returns_false_and_changes_nothing() {
    let (db, user_id) = fresh_db_with_user().await;
    let (formation, holdings) = sample_snapshot();
    let input = PortfolioInput { name: "Keep me".to_string(), formation, holdings };
    let id = db.save_portfolio(user_id, &input).await.unwrap();

    assert!(!db.delete_portfolio(user_id, 12345).await.unwrap());
    assert_eq!(db.list_portfolios(user_id).await.unwrap().len(), 1);

    assert!(db.delete_portfolio(user_id, id).await.unwrap());
    assert!(db.list_portfolios(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn portfolios_are_scoped_to_their_owner() {
    let (db, owner_id) = fresh_db_with_user().await;
    let other = db.create_user("other@example.com", "pw", "Other").await.unwrap();

    let (formation, holdings) = sample_snapshot();
    let input = PortfolioInput { name: "Private".to_string(), formation, holdings };
    let id = db.save_portfolio(owner_id, &input).await.unwrap();

    assert!(db.get_portfolio(other.id, id).await.unwrap().is_none());
    assert!(!db.delete_portfolio(other.id, id).await.unwrap());
    assert!(db.list_portfolios(other.id).await.unwrap().is_empty());
    // Still there for the owner.
    assert!(db.get_portfolio(owner_id, id).await.unwrap().is_some());
}

#[tokio::test]
async fn autosave_upserts_a_single_row() {
    let (db, user_id) = fresh_db_with_user().await;
    let (formation, holdings) = sample_snapshot();

    let first = db
        .autosave_portfolio(user_id, AUTOSAVE_NAME, &formation, &holdings)
        .await
        .unwrap();
    let second = db
        .autosave_portfolio(user_id, AUTOSAVE_NAME, &formation, &holdings[..1])
        .await
        .unwrap();
    assert_eq!(first, second);

    let all = db.list_portfolios(user_id).await.unwrap();
    assert_eq!(all.iter().filter(|p| p.is_autosave).count(), 1);

    let autosave = db.get_autosave(user_id).await.unwrap().unwrap();
    assert_eq!(autosave.holdings.len(), 1);
    assert_eq!(autosave.name, AUTOSAVE_NAME);
}

#[tokio::test]
async fn autosave_does_not_collide_with_manual_saves() {
    let (db, user_id) = fresh_db_with_user().await;
    let (formation, holdings) = sample_snapshot();

    // A manual save may even use the autosave display name; identity is
    // the flag, not the name.
    let input = PortfolioInput {
        name: AUTOSAVE_NAME.to_string(),
        formation: formation.clone(),
        holdings: holdings.clone(),
    };
    let manual_id = db.save_portfolio(user_id, &input).await.unwrap();
    let auto_id = db
        .autosave_portfolio(user_id, AUTOSAVE_NAME, &formation, &holdings)
        .await
        .unwrap();

    assert_ne!(manual_id, auto_id);
    let all = db.list_portfolios(user_id).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.iter().filter(|p| p.is_autosave).count(), 1);
}

#[tokio::test]
async fn corrupt_holdings_degrade_to_empty_for_that_record_only() {
    let (db, user_id) = fresh_db_with_user().await;
    let (formation, holdings) = sample_snapshot();

    let good = PortfolioInput {
        name: "Good".to_string(),
        formation: formation.clone(),
        holdings: holdings.clone(),
    };
    let bad = PortfolioInput { name: "Bad".to_string(), formation, holdings };
    let good_id = db.save_portfolio(user_id, &good).await.unwrap();
    let bad_id = db.save_portfolio(user_id, &bad).await.unwrap();

    db.with_connection(move |conn| {
        conn.execute(
            "UPDATE portfolios SET holdings = 'not-json{' WHERE id = ?1",
            [bad_id],
        )?;
        Ok(())
    })
    .await
    .unwrap();

    let all = db.list_portfolios(user_id).await.unwrap();
    assert_eq!(all.len(), 2);
    let bad_row = all.iter().find(|p| p.id == bad_id).unwrap();
    assert!(bad_row.holdings.is_empty());
    let good_row = all.iter().find(|p| p.id == good_id).unwrap();
    assert_eq!(good_row.holdings.len(), 3);
}

#[tokio::test]
async fn registration_rejects_taken_emails() {
    let (db, _) = fresh_db_with_user().await;
    let mut session = SessionManager::new(db);

    let result = session.register("owner@example.com", "other-pw", "Imposter").await;
    assert!(matches!(result, Err(StoreError::EmailTaken(_))));
    assert!(!session.is_signed_in());
}

#[tokio::test]
async fn login_requires_matching_credentials() {
    let (db, user_id) = fresh_db_with_user().await;
    let mut session = SessionManager::new(db);

    assert!(matches!(
        session.login("owner@example.com", "wrong").await,
        Err(StoreError::InvalidCredentials)
    ));
    assert!(matches!(
        session.login("nobody@example.com", "hunter2").await,
        Err(StoreError::InvalidCredentials)
    ));

    let profile = session.login("owner@example.com", "hunter2").await.unwrap();
    assert_eq!(profile.id, user_id);
    assert!(session.is_signed_in());

    session.logout().await.unwrap();
    assert!(!session.is_signed_in());
}

#[tokio::test]
async fn session_survives_a_restart() {
    let (db, user_id) = fresh_db_with_user().await;

    {
        let mut session = SessionManager::new(db.clone());
        session.login("owner@example.com", "hunter2").await.unwrap();
    }

    // A new manager over the same store stands in for a restart.
    let mut rehydrated = SessionManager::new(db.clone());
    let profile = rehydrated.restore().await.unwrap().expect("session restored");
    assert_eq!(profile.id, user_id);

    rehydrated.logout().await.unwrap();
    let mut after_logout = SessionManager::new(db);
    assert!(after_logout.restore().await.unwrap().is_none());
}

#[tokio::test]
async fn corrupt_session_profile_degrades_to_signed_out() {
    let (db, _) = fresh_db_with_user().await;
    db.set_meta("session_user", "{broken").await.unwrap();

    let mut session = SessionManager::new(db.clone());
    assert!(session.restore().await.unwrap().is_none());
    assert!(!session.is_signed_in());
    // The broken blob was cleared.
    assert_eq!(db.get_meta("session_user").await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn autosaver_debounces_bursts_into_one_write() {
    let (db, user_id) = fresh_db_with_user().await;
    let (formation, holdings) = sample_snapshot();
    let saver = Autosaver::spawn(db.clone(), Duration::from_secs(2));

    // A burst of mutations well inside the quiet period.
    for kept in 1..=3 {
        saver.schedule(AutosaveRequest {
            user_id,
            formation: formation.clone(),
            holdings: holdings[..kept].to_vec(),
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    // Nothing may land before the quiet period elapses.
    assert!(db.get_autosave(user_id).await.unwrap().is_none());

    tokio::time::sleep(Duration::from_secs(3)).await;
    tokio::task::yield_now().await;

    let autosave = db.get_autosave(user_id).await.unwrap().expect("debounced write landed");
    // Only the last snapshot of the burst was written.
    assert_eq!(autosave.holdings.len(), 3);

    // A later burst updates the same row.
    saver.schedule(AutosaveRequest {
        user_id,
        formation: formation.clone(),
        holdings: holdings[..1].to_vec(),
    });
    tokio::time::sleep(Duration::from_secs(3)).await;
    tokio::task::yield_now().await;

    let again = db.get_autosave(user_id).await.unwrap().unwrap();
    assert_eq!(again.id, autosave.id);
    assert_eq!(again.holdings.len(), 1);
    assert_eq!(
        db.list_portfolios(user_id).await.unwrap().iter().filter(|p| p.is_autosave).count(),
        1
    );

    saver.shutdown();
}
