//! services/api/src/web/validation.rs
//!
//! Explicit checks applied to request payloads before any service is called.
//! Each function either returns the typed input the core expects or an
//! `ApiError::Validation` listing every problem found.

use regex::Regex;
use reading_tracker_core::domain::{BookDraft, BookFilter, PageRequest};
use reading_tracker_core::services::DEFAULT_TOP_BOOKS;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::dto::{
    BookRequest, ListBooksQuery, LoginRequest, RegisterRequest, SaveIntervalRequest,
    TopBooksQuery,
};

const MAX_TOP_BOOKS: i64 = 100;
const PASSWORD_SPECIALS: &str = "@$!%*#?&";

/// Validated login or registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Validated reading-interval input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalInput {
    pub book_id: Uuid,
    pub start_page: u32,
    pub end_page: u32,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn password_charset() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z\d@$!%*#?&]{8,}$").expect("valid password regex"))
}

fn finish<T>(value: T, errors: Vec<String>) -> Result<T, ApiError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ApiError::Validation(errors))
    }
}

fn check_email(email: &str, errors: &mut Vec<String>) {
    if email.trim().is_empty() {
        errors.push("email should not be empty".to_string());
    } else if !email_pattern().is_match(email) {
        errors.push("email must be an email".to_string());
    }
}

/// Reads a strictly positive integer that fits the `INTEGER` page columns.
fn positive(field: &str, value: i64, errors: &mut Vec<String>) -> u32 {
    match i32::try_from(value) {
        Ok(parsed) if parsed > 0 => parsed as u32,
        Ok(_) => {
            errors.push(format!("{} must be a positive number", field));
            0
        }
        Err(_) => {
            errors.push(format!("{} must not be greater than {}", field, i32::MAX));
            0
        }
    }
}

pub fn validate_register(req: RegisterRequest) -> Result<Credentials, ApiError> {
    let mut errors = Vec::new();
    check_email(&req.email, &mut errors);

    let password = &req.password;
    let strong = password_charset().is_match(password)
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if !strong {
        errors.push(
            "Password must be at least 8 characters long and contain at least one letter, \
             one number, and one special character"
                .to_string(),
        );
    }

    finish(
        Credentials {
            email: req.email,
            password: req.password,
        },
        errors,
    )
}

pub fn validate_login(req: LoginRequest) -> Result<Credentials, ApiError> {
    let mut errors = Vec::new();
    check_email(&req.email, &mut errors);
    if req.password.is_empty() {
        errors.push("password should not be empty".to_string());
    }
    finish(
        Credentials {
            email: req.email,
            password: req.password,
        },
        errors,
    )
}

pub fn validate_book(req: BookRequest) -> Result<BookDraft, ApiError> {
    let mut errors = Vec::new();
    let name = req.name.trim().to_string();
    if name.is_empty() {
        errors.push("name should not be empty".to_string());
    }
    let number_of_pages = positive("numberOfPages", req.number_of_pages, &mut errors);
    finish(
        BookDraft {
            name,
            number_of_pages,
        },
        errors,
    )
}

pub fn validate_list_query(query: ListBooksQuery) -> Result<(BookFilter, PageRequest), ApiError> {
    let mut errors = Vec::new();
    let page = query
        .page
        .map(|value| positive("page", value, &mut errors))
        .unwrap_or(PageRequest::DEFAULT_PAGE);
    let per_page = query
        .per_page
        .map(|value| positive("perPage", value, &mut errors))
        .unwrap_or(PageRequest::DEFAULT_PER_PAGE);
    let number_of_pages = query
        .number_of_pages
        .map(|value| positive("numberOfPages", value, &mut errors));

    finish(
        (
            BookFilter {
                search: query.search.filter(|search| !search.is_empty()),
                number_of_pages,
            },
            PageRequest { page, per_page },
        ),
        errors,
    )
}

pub fn validate_top_query(query: TopBooksQuery) -> Result<usize, ApiError> {
    match query.limit {
        None => Ok(DEFAULT_TOP_BOOKS),
        Some(limit) if (1..=MAX_TOP_BOOKS).contains(&limit) => Ok(limit as usize),
        Some(_) => Err(ApiError::Validation(vec![format!(
            "limit must be between 1 and {}",
            MAX_TOP_BOOKS
        )])),
    }
}

pub fn validate_interval(req: SaveIntervalRequest) -> Result<IntervalInput, ApiError> {
    let mut errors = Vec::new();
    let book_id = match Uuid::parse_str(&req.book_id) {
        Ok(id) => id,
        Err(_) => {
            errors.push("bookId must be a UUID".to_string());
            Uuid::nil()
        }
    };
    let start_page = positive("startPage", req.start_page, &mut errors);
    let end_page = positive("endPage", req.end_page, &mut errors);
    if start_page > 0 && end_page > 0 && start_page > end_page {
        errors.push("startPage must not be greater than endPage".to_string());
    }
    finish(
        IntervalInput {
            book_id,
            start_page,
            end_page,
        },
        errors,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation(messages) => messages,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn register_requires_a_strong_password_and_real_email() {
        let ok = validate_register(RegisterRequest {
            email: "octane@gmail.com".to_string(),
            password: "Octane@123".to_string(),
        });
        assert!(ok.is_ok());

        for weak in ["short@1", "NoDigits@here", "NoSpecial123", "has space@1"] {
            let err = validate_register(RegisterRequest {
                email: "octane@gmail.com".to_string(),
                password: weak.to_string(),
            })
            .unwrap_err();
            assert_eq!(messages(err).len(), 1, "{} should be rejected", weak);
        }

        let err = validate_register(RegisterRequest {
            email: "not-an-email".to_string(),
            password: "bad".to_string(),
        })
        .unwrap_err();
        assert_eq!(messages(err).len(), 2);
    }

    #[test]
    fn interval_accepts_single_page_and_rejects_inversions() {
        let id = Uuid::new_v4();
        let input = validate_interval(SaveIntervalRequest {
            book_id: id.to_string(),
            start_page: 7,
            end_page: 7,
        })
        .unwrap();
        assert_eq!(input.book_id, id);

        let err = validate_interval(SaveIntervalRequest {
            book_id: id.to_string(),
            start_page: 9,
            end_page: 3,
        })
        .unwrap_err();
        assert_eq!(
            messages(err),
            vec!["startPage must not be greater than endPage".to_string()]
        );

        let err = validate_interval(SaveIntervalRequest {
            book_id: "42".to_string(),
            start_page: 0,
            end_page: -1,
        })
        .unwrap_err();
        assert_eq!(messages(err).len(), 3);
    }

    #[test]
    fn list_query_defaults_and_bounds() {
        let (filter, page) = validate_list_query(ListBooksQuery::default()).unwrap();
        assert_eq!(filter, BookFilter::default());
        assert_eq!(page, PageRequest::default());

        let err = validate_list_query(ListBooksQuery {
            page: Some(0),
            ..ListBooksQuery::default()
        })
        .unwrap_err();
        assert_eq!(messages(err), vec!["page must be a positive number".to_string()]);
    }

    #[test]
    fn book_requires_name_and_positive_pages() {
        let draft = validate_book(BookRequest {
            name: "  Clean Code ".to_string(),
            number_of_pages: 464,
        })
        .unwrap();
        assert_eq!(draft.name, "Clean Code");

        let err = validate_book(BookRequest {
            name: " ".to_string(),
            number_of_pages: 0,
        })
        .unwrap_err();
        assert_eq!(messages(err).len(), 2);
    }

    #[test]
    fn page_counts_must_fit_the_integer_column() {
        let draft = validate_book(BookRequest {
            name: "Largest".to_string(),
            number_of_pages: i64::from(i32::MAX),
        })
        .unwrap();
        assert_eq!(draft.number_of_pages, i32::MAX as u32);

        let err = validate_book(BookRequest {
            name: "Too large".to_string(),
            number_of_pages: 3_000_000_000,
        })
        .unwrap_err();
        assert_eq!(
            messages(err),
            vec![format!("numberOfPages must not be greater than {}", i32::MAX)]
        );

        let err = validate_list_query(ListBooksQuery {
            number_of_pages: Some(i64::from(i32::MAX) + 1),
            ..ListBooksQuery::default()
        })
        .unwrap_err();
        assert_eq!(messages(err).len(), 1);
    }

    #[test]
    fn patterns_compile() {
        assert!(email_pattern().is_match("octane@gmail.com"));
        assert!(password_charset().is_match("Octane@123"));
    }

    #[test]
    fn top_limit_is_bounded() {
        assert_eq!(validate_top_query(TopBooksQuery::default()).unwrap(), 5);
        assert_eq!(validate_top_query(TopBooksQuery { limit: Some(3) }).unwrap(), 3);
        assert!(validate_top_query(TopBooksQuery { limit: Some(0) }).is_err());
        assert!(validate_top_query(TopBooksQuery { limit: Some(1000) }).is_err());
    }
}
