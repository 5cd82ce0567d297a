use std::sync::Arc;

use tracing::warn;

use crate::{
    entities::contact::{Contact, ContactFilter, ContactSort, NewContact, UpdateContactStatus},
    errors::AppError,
    listing::{ListQuery, Paginated},
    repositories::{contact::ContactRepository, notifier::ContactNotifier},
    utils::valid_uuid::valid_uuid,
};

const NOT_FOUND: &str = "Contact not found";

pub struct ContactHandler<R, N>
where
    R: ContactRepository + ?Sized,
    N: ContactNotifier + ?Sized,
{
    pub contact_repo: Arc<R>,
    pub notifier: Arc<N>,
}

impl<R, N> ContactHandler<R, N>
where
    R: ContactRepository + ?Sized,
    N: ContactNotifier + ?Sized,
{
    pub fn new(contact_repo: Arc<R>, notifier: Arc<N>) -> Self {
        ContactHandler { contact_repo, notifier }
    }

    /// Stores the submission, then attempts a notification whose failure is only logged.
    pub async fn submit_contact(&self, request: NewContact) -> Result<Contact, AppError> {
        let insert = request.into_insert()?;
        let contact = self.contact_repo.create(&insert).await?;

        tracing::info!(contact_id = %contact.id, "Contact form submitted");

        if let Err(e) = self.notifier.notify(&contact).await {
            warn!(contact_id = %contact.id, error = %e, "Contact notification failed");
        }

        Ok(contact)
    }

    pub async fn list_contacts(
        &self,
        query: ListQuery<ContactFilter, ContactSort>,
    ) -> Result<Paginated<Contact>, AppError> {
        let total = self.contact_repo.count(&query.filter).await?;
        let data = self
            .contact_repo
            .find(&query.filter, &query.sort, Some(query.page.window()))
            .await?;

        Ok(Paginated::new(data, query.page, total))
    }

    pub async fn get_contact(&self, id: &str) -> Result<Contact, AppError> {
        let id = valid_uuid(id, NOT_FOUND)?;

        self.contact_repo
            .get(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    /// Any status may follow any other.
    pub async fn update_status(&self, id: &str, request: UpdateContactStatus) -> Result<Contact, AppError> {
        let id = valid_uuid(id, NOT_FOUND)?;
        let status = request.parse()?;

        self.contact_repo
            .update_status(&id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id, NOT_FOUND)?;

        if self.contact_repo.delete(&id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(NOT_FOUND.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{
        entities::contact::{ContactInsert, ContactStatus},
        repositories::{contact::MockContactRepository, notifier::MockContactNotifier},
    };

    fn submission() -> NewContact {
        NewContact {
            name: Some("Ada Lovelace".into()),
            email: Some("  Ada@Example.COM ".into()),
            subject: Some("Hello there".into()),
            message: Some("I would like to talk about a project.".into()),
        }
    }

    fn handler(
        repo: MockContactRepository,
        notifier: MockContactNotifier,
    ) -> ContactHandler<MockContactRepository, MockContactNotifier> {
        ContactHandler::new(Arc::new(repo), Arc::new(notifier))
    }

    fn echo_create(repo: &mut MockContactRepository) {
        repo.expect_create()
            .times(1)
            .returning(|insert: &ContactInsert| Ok(insert.clone().into_contact(Uuid::new_v4(), Utc::now())));
    }

    #[actix_rt::test]
    async fn notification_failure_does_not_fail_submission() {
        let mut repo = MockContactRepository::new();
        echo_create(&mut repo);

        let mut notifier = MockContactNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("smtp unreachable")));

        let contact = handler(repo, notifier).submit_contact(submission()).await.unwrap();
        assert_eq!(contact.email, "ada@example.com");
        assert_eq!(contact.status, ContactStatus::New);
    }

    #[actix_rt::test]
    async fn invalid_submission_stores_and_notifies_nothing() {
        let repo = MockContactRepository::new();
        let notifier = MockContactNotifier::new();

        let request = NewContact { subject: Some("Hi".into()), ..submission() };
        let err = handler(repo, notifier).submit_contact(request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[actix_rt::test]
    async fn status_may_move_backwards() {
        let mut repo = MockContactRepository::new();
        repo.expect_update_status()
            .withf(|_, status| *status == ContactStatus::New)
            .returning(|id, status| {
                let mut contact = ContactInsert {
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                    subject: "Hello there".into(),
                    message: "A message long enough".into(),
                }
                .into_contact(*id, Utc::now());
                contact.status = status;
                Ok(Some(contact))
            });

        let request = UpdateContactStatus { status: Some("new".into()) };
        let contact = handler(repo, MockContactNotifier::new())
            .update_status(&Uuid::new_v4().to_string(), request)
            .await
            .unwrap();
        assert_eq!(contact.status, ContactStatus::New);
    }

    #[actix_rt::test]
    async fn unknown_status_is_rejected() {
        let request = UpdateContactStatus { status: Some("archived".into()) };
        let err = handler(MockContactRepository::new(), MockContactNotifier::new())
            .update_status(&Uuid::new_v4().to_string(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
