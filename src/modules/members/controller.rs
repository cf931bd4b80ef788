use std::sync::Arc;

use libris_db::StoreResult;

use super::models::Member;
use super::repository::MemberRepository;
use crate::modules::books::models::Book;
use crate::modules::books::repository::BookRepository;
use crate::view::LibraryView;

/// Business rules for members and the book each one borrows.
pub struct MemberController {
    view: Arc<dyn LibraryView>,
    members: Arc<dyn MemberRepository>,
    books: Arc<dyn BookRepository>,
}

impl MemberController {
    pub fn new(
        view: Arc<dyn LibraryView>,
        members: Arc<dyn MemberRepository>,
        books: Arc<dyn BookRepository>,
    ) -> Self {
        Self {
            view,
            members,
            books,
        }
    }

    pub async fn new_member(&self, member: &Member) -> StoreResult<()> {
        if member.id <= 0 {
            tracing::warn!(id = member.id, "rejected member with non-positive id");
            self.view
                .show_member_error("ID must be a positive number", Some(member));
            return Ok(());
        }

        if let Some(existing) = self.members.find_by_id(member.id).await? {
            tracing::warn!(id = member.id, "rejected member with duplicate id");
            self.view
                .show_member_error(&format!("ID Already exists {}", member.id), Some(&existing));
            return Ok(());
        }

        self.members.save(member).await?;
        tracing::info!(id = member.id, "member added");
        self.view.member_added(member);
        Ok(())
    }

    pub async fn find_by_id(&self, id: i32) -> StoreResult<Option<Member>> {
        self.members.find_by_id(id).await
    }

    /// Every member, with each borrowed book reloaded from the book
    /// repository. A member whose book can no longer be found keeps the copy
    /// it was read with.
    pub async fn all_members(&self) -> StoreResult<Vec<Member>> {
        let mut members = self.members.find_all().await?;
        for member in &mut members {
            let Some(book_id) = member.book.as_ref().map(|book| book.id) else {
                continue;
            };
            if let Some(current) = self.books.find_by_id(book_id).await? {
                member.book = Some(current);
            }
        }

        self.view.show_all_members(&members);
        Ok(members)
    }

    /// Attach `book` to `member`, both re-read from their repositories.
    ///
    /// On success the view gets a dropdown refresh followed by two member
    /// listings: one from `all_members` itself and one with its result.
    pub async fn borrow_book(&self, member: Option<&Member>, book: Option<&Book>) -> StoreResult<()> {
        let Some(book) = book else {
            self.view.show_book_error("Book cannot be null", None);
            return Ok(());
        };
        let Some(member) = member else {
            self.view.show_member_error("Member cannot be null", None);
            return Ok(());
        };

        let existing_member = self.members.find_by_id(member.id).await?;
        let existing_book = self.books.find_by_id(book.id).await?;
        let (Some(mut existing_member), Some(existing_book)) = (existing_member, existing_book) else {
            tracing::warn!(
                member = member.id,
                book = book.id,
                "borrow rejected, member or book missing"
            );
            self.view.show_member_error("Member or Book not found", None);
            return Ok(());
        };

        existing_member.book = Some(existing_book.clone());
        self.members.save(&existing_member).await?;
        self.books.save(&existing_book).await?;
        tracing::info!(member = member.id, book = book.id, "book borrowed");

        self.view.refresh_book_dropdown();
        let members = self.all_members().await?;
        self.view.show_all_members(&members);
        Ok(())
    }

    pub async fn delete_member(&self, member: &Member) -> StoreResult<()> {
        if self.members.find_by_id(member.id).await?.is_none() {
            self.view.show_member_not_found(
                &format!("No existing member with id {}", member.id),
                Some(member),
            );
            return Ok(());
        }

        self.members.delete(member.id).await?;
        tracing::info!(id = member.id, "member removed");
        self.view.member_removed(member);
        Ok(())
    }

    pub async fn search_member(&self, id: i32) -> StoreResult<()> {
        match self.members.find_by_id(id).await? {
            Some(member) => self.view.show_searched_member(&member),
            None => self
                .view
                .show_member_not_found(&format!("No existing member with id {}", id), None),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::mocks::{MockBookRepo, MockMemberRepo};
    use crate::view::{RecordingView, ViewEvent};
    use mockall::predicate::eq;

    fn valid_book() -> Book {
        Book::new(1, "123", "Book1", "Author1", "Genre1")
    }

    fn valid_member() -> Member {
        Member::new(1, "owais", "owais@gmail.com", Some(valid_book()))
    }

    fn setup(members: MockMemberRepo, books: MockBookRepo) -> (Arc<RecordingView>, MemberController) {
        let view = Arc::new(RecordingView::new());
        let controller = MemberController::new(view.clone(), Arc::new(members), Arc::new(books));
        (view, controller)
    }

    fn is_all_members(event: &ViewEvent) -> bool {
        matches!(event, ViewEvent::AllMembers(_))
    }

    #[tokio::test]
    async fn all_members_reloads_borrowed_books() {
        let stale = Member::new(1, "owais", "owais@gmail.com", Some(Book::new(1, "123", "Stale", "A", "G")));
        let another = Member::new(2, "test2", "test2@gmail.com", None);
        let listed = vec![stale, another.clone()];

        let mut members = MockMemberRepo::new();
        members
            .expect_find_all()
            .returning(move || Ok(listed.clone()));
        let mut books = MockBookRepo::new();
        books
            .expect_find_by_id()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(Some(valid_book())));

        let (view, controller) = setup(members, books);
        let result = controller.all_members().await.unwrap();

        assert_eq!(result, vec![valid_member(), another]);
        assert_eq!(view.events(), vec![ViewEvent::AllMembers(result)]);
    }

    #[tokio::test]
    async fn all_members_empty() {
        let mut members = MockMemberRepo::new();
        members.expect_find_all().returning(|| Ok(Vec::new()));

        let (view, controller) = setup(members, MockBookRepo::new());
        let result = controller.all_members().await.unwrap();

        assert!(result.is_empty());
        assert_eq!(view.events(), vec![ViewEvent::AllMembers(Vec::new())]);
    }

    #[tokio::test]
    async fn all_members_keeps_book_when_reload_misses() {
        let unknown = Book::new(99, "999", "unknown Book", "unknown Author2", "Genre2");
        let member = Member::new(4, "test2", "test2@gmail.com", Some(unknown.clone()));
        let listed = vec![member];

        let mut members = MockMemberRepo::new();
        members
            .expect_find_all()
            .returning(move || Ok(listed.clone()));
        let mut books = MockBookRepo::new();
        books.expect_find_by_id().with(eq(99)).returning(|_| Ok(None));

        let (view, controller) = setup(members, books);
        let result = controller.all_members().await.unwrap();

        assert_eq!(result[0].book, Some(unknown));
        assert_eq!(view.count(is_all_members), 1);
    }

    #[tokio::test]
    async fn new_member_rejects_non_positive_id() {
        let invalid = Member::new(0, "Invalid", "invalid@gmail.com", None);
        let mut members = MockMemberRepo::new();
        members.expect_save().never();

        let (view, controller) = setup(members, MockBookRepo::new());
        controller.new_member(&invalid).await.unwrap();

        assert_eq!(
            view.events(),
            vec![ViewEvent::MemberError {
                message: "ID must be a positive number".to_string(),
                member: Some(invalid),
            }]
        );
    }

    #[tokio::test]
    async fn new_member_duplicate_id_reports_existing_member() {
        let incoming = Member::new(1, "someone else", "else@gmail.com", None);
        let mut members = MockMemberRepo::new();
        members
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(valid_member())));
        members.expect_save().never();

        let (view, controller) = setup(members, MockBookRepo::new());
        controller.new_member(&incoming).await.unwrap();

        assert_eq!(
            view.events(),
            vec![ViewEvent::MemberError {
                message: "ID Already exists 1".to_string(),
                member: Some(valid_member()),
            }]
        );
    }

    #[tokio::test]
    async fn new_member_saves_valid_member() {
        let new_member = Member::new(3, "New Member", "new@gmail.com", None);
        let mut members = MockMemberRepo::new();
        members.expect_find_by_id().with(eq(3)).returning(|_| Ok(None));
        members
            .expect_save()
            .with(eq(new_member.clone()))
            .times(1)
            .returning(|_| Ok(()));

        let (view, controller) = setup(members, MockBookRepo::new());
        controller.new_member(&new_member).await.unwrap();

        assert_eq!(view.events(), vec![ViewEvent::MemberAdded(new_member)]);
    }

    #[tokio::test]
    async fn borrow_without_book_is_a_book_error() {
        let mut members = MockMemberRepo::new();
        members.expect_save().never();
        let mut books = MockBookRepo::new();
        books.expect_save().never();

        let (view, controller) = setup(members, books);
        controller
            .borrow_book(Some(&valid_member()), None)
            .await
            .unwrap();

        assert_eq!(
            view.events(),
            vec![ViewEvent::BookError {
                message: "Book cannot be null".to_string(),
                book: None,
            }]
        );
    }

    #[tokio::test]
    async fn borrow_without_member_is_a_member_error() {
        let mut members = MockMemberRepo::new();
        members.expect_save().never();
        let mut books = MockBookRepo::new();
        books.expect_save().never();

        let (view, controller) = setup(members, books);
        controller.borrow_book(None, Some(&valid_book())).await.unwrap();

        assert_eq!(
            view.events(),
            vec![ViewEvent::MemberError {
                message: "Member cannot be null".to_string(),
                member: None,
            }]
        );
    }

    #[tokio::test]
    async fn borrow_with_unknown_member_or_book() {
        for (member_known, book_known) in [(false, true), (true, false)] {
            let mut members = MockMemberRepo::new();
            members
                .expect_find_by_id()
                .with(eq(1))
                .returning(move |_| Ok(member_known.then(valid_member)));
            members.expect_save().never();
            let mut books = MockBookRepo::new();
            books
                .expect_find_by_id()
                .with(eq(1))
                .returning(move |_| Ok(book_known.then(valid_book)));
            books.expect_save().never();

            let (view, controller) = setup(members, books);
            controller
                .borrow_book(Some(&valid_member()), Some(&valid_book()))
                .await
                .unwrap();

            assert_eq!(
                view.events(),
                vec![ViewEvent::MemberError {
                    message: "Member or Book not found".to_string(),
                    member: None,
                }]
            );
        }
    }

    #[tokio::test]
    async fn borrow_book_saves_both_and_lists_members_twice() {
        let without_book = Member::new(1, "owais", "owais@gmail.com", None);
        let listed = vec![valid_member()];

        let mut members = MockMemberRepo::new();
        let stored = without_book.clone();
        members
            .expect_find_by_id()
            .with(eq(1))
            .returning(move |_| Ok(Some(stored.clone())));
        members
            .expect_save()
            .with(eq(valid_member()))
            .times(1)
            .returning(|_| Ok(()));
        members
            .expect_find_all()
            .times(1)
            .returning(move || Ok(listed.clone()));

        let mut books = MockBookRepo::new();
        books
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(valid_book())));
        books
            .expect_save()
            .with(eq(valid_book()))
            .times(1)
            .returning(|_| Ok(()));

        let (view, controller) = setup(members, books);
        controller
            .borrow_book(Some(&without_book), Some(&valid_book()))
            .await
            .unwrap();

        let events = view.events();
        assert_eq!(events.first(), Some(&ViewEvent::BookDropdownRefreshed));
        assert_eq!(view.count(|e| *e == ViewEvent::BookDropdownRefreshed), 1);
        assert_eq!(view.count(is_all_members), 2);
        assert_eq!(events.len(), 3);
    }

    #[tokio::test]
    async fn delete_member_missing_never_deletes() {
        let missing = Member::new(99, "Non-existent", "none@example.com", None);
        let mut members = MockMemberRepo::new();
        members.expect_find_by_id().with(eq(99)).returning(|_| Ok(None));
        members.expect_delete().never();

        let (view, controller) = setup(members, MockBookRepo::new());
        controller.delete_member(&missing).await.unwrap();

        assert_eq!(
            view.events(),
            vec![ViewEvent::MemberNotFound {
                message: "No existing member with id 99".to_string(),
                member: Some(missing),
            }]
        );
    }

    #[tokio::test]
    async fn delete_member_existing() {
        let mut members = MockMemberRepo::new();
        members
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(valid_member())));
        members
            .expect_delete()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(()));

        let (view, controller) = setup(members, MockBookRepo::new());
        controller.delete_member(&valid_member()).await.unwrap();

        assert_eq!(view.events(), vec![ViewEvent::MemberRemoved(valid_member())]);
    }

    #[tokio::test]
    async fn search_member_found_and_missing() {
        let mut members = MockMemberRepo::new();
        members
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(valid_member())));
        members.expect_find_by_id().with(eq(99)).returning(|_| Ok(None));

        let (view, controller) = setup(members, MockBookRepo::new());
        controller.search_member(1).await.unwrap();
        controller.search_member(99).await.unwrap();

        assert_eq!(
            view.events(),
            vec![
                ViewEvent::SearchedMember(valid_member()),
                ViewEvent::MemberNotFound {
                    message: "No existing member with id 99".to_string(),
                    member: None,
                },
            ]
        );
    }
}
