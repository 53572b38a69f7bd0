use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use mailbackup::email::date_filter::{decide, Verdict};
use mailbackup::email::date_parser::parse_email_date;
use mailbackup::email::filename::{
    build_filename, date_tag, sanitize_subject, FileNaming, MAX_SUBJECT_LEN, NO_DATE, NO_SUBJECT,
};
use mailbackup::email::{FolderKind, MessageRecord};

fn cutoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 12, 0, 0, 0).unwrap()
}

#[test]
fn test_rfc2822_matches_chrono() {
    let samples = [
        "Fri, 12 Sep 2025 00:00:00 +0000",
        "Thu, 11 Sep 2025 23:59:59 -0700",
        "Mon, 15 Sep 2025 08:30:00 +0300",
        "12 Sep 2025 10:00:00 GMT",
        "Tue, 1 Jul 2003 10:52:37 +0200",
    ];

    for sample in samples {
        assert_eq!(
            parse_email_date(sample),
            DateTime::parse_from_rfc2822(sample).ok(),
            "mismatch for '{}'",
            sample
        );
        assert!(parse_email_date(sample).is_some());
    }
}

#[test]
fn test_folded_whitespace_is_normalized() {
    let parsed = parse_email_date("  Fri, 12 Sep 2025\r\n\t 00:00:00 +0000 ").unwrap();
    assert_eq!(parsed.with_timezone(&Utc), cutoff());
}

#[test]
fn test_fallback_without_offset_is_utc() {
    let parsed = parse_email_date("Fri, 12 Sep 2025 10:15:00").unwrap();
    assert_eq!(parsed.offset().local_minus_utc(), 0);
    assert_eq!(
        parsed.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2025, 9, 12, 10, 15, 0).unwrap()
    );
}

#[test]
fn test_fallback_iso_like() {
    let parsed = parse_email_date("2025-09-12 03:00:00+0300").unwrap();
    assert_eq!(parsed.with_timezone(&Utc), cutoff());
}

#[test]
fn test_undeterminable_dates() {
    for garbage in ["", "   ", "yesterday", "32 Foo 2025 99:99:99", "2025/09/12"] {
        assert_eq!(parse_email_date(garbage), None, "'{}' should not parse", garbage);
    }
}

#[test]
fn test_filter_is_inclusive() {
    let at_cutoff = cutoff().fixed_offset();
    let before = (cutoff() - chrono::Duration::seconds(1)).fixed_offset();

    assert_eq!(decide(Some(&at_cutoff), &cutoff()), Verdict::Keep);
    assert_eq!(decide(Some(&before), &cutoff()), Verdict::Skip);
    assert_eq!(decide(None, &cutoff()), Verdict::KeepUndated);
    assert!(Verdict::KeepUndated.is_kept());
    assert!(!Verdict::Skip.is_kept());
}

#[test]
fn test_filter_ignores_offset_representation() {
    let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
    let same_instant = moscow.with_ymd_and_hms(2025, 9, 12, 3, 0, 0).unwrap();
    let utc_form = parse_email_date("Fri, 12 Sep 2025 00:00:00").unwrap();

    assert_eq!(same_instant, utc_form);
    assert_eq!(
        decide(Some(&same_instant), &cutoff()),
        decide(Some(&utc_form), &cutoff())
    );
    assert_eq!(decide(Some(&same_instant), &cutoff()), Verdict::Keep);
}

#[test]
fn test_sanitize_replaces_and_truncates() {
    assert_eq!(sanitize_subject("Re: hello/world?"), "Re_ hello_world_");
    assert_eq!(sanitize_subject("Счёт №5 - оплата.pdf"), "Счёт _5 - оплата.pdf");

    let long = "x".repeat(120);
    assert_eq!(sanitize_subject(&long).chars().count(), MAX_SUBJECT_LEN);
}

#[test]
fn test_sanitize_is_idempotent() {
    let subjects = [
        "Re: [JIRA] (PROJ-1) Something broke!",
        "Привет, мир: тест <b>жирный</b> & more stuff that goes on and on and on",
        "plain subject",
        "",
    ];

    for subject in subjects {
        let once = sanitize_subject(subject);
        assert_eq!(sanitize_subject(&once), once);
        assert!(once.chars().count() <= MAX_SUBJECT_LEN);
    }
}

#[test]
fn test_build_filename_variants() {
    let date = parse_email_date("Fri, 12 Sep 2025 00:00:00 +0000");

    assert_eq!(
        build_filename(FileNaming::Sequential, 1, date.as_ref(), Some("Hello")),
        "0001_20250912_Hello.eml"
    );
    assert_eq!(
        build_filename(FileNaming::Sequential, 12, None, None),
        format!("0012_{}_{}.eml", NO_DATE, NO_SUBJECT)
    );
    assert_eq!(
        build_filename(FileNaming::FolderTagged(FolderKind::Sent), 3, date.as_ref(), Some("  ")),
        format!("SENT_0003_20250912_{}.eml", NO_SUBJECT)
    );
    assert_eq!(
        build_filename(FileNaming::FolderTagged(FolderKind::Inbox), 10000, None, Some("Big")),
        "INBOX_10000_nodate_Big.eml"
    );
}

#[test]
fn test_date_tag_uses_message_offset() {
    let late_evening = parse_email_date("Thu, 11 Sep 2025 23:30:00 -0500");
    assert_eq!(date_tag(late_evening.as_ref()), "20250911");
    assert_eq!(date_tag(None), NO_DATE);
}

#[test]
fn test_message_record_decodes_encoded_subject() {
    let raw = b"Date: Fri, 12 Sep 2025 09:00:00 +0300\r\n\
Subject: =?UTF-8?B?0J/RgNC40LLQtdGC?=\r\n\
\r\n\
body\r\n"
        .to_vec();

    let record = MessageRecord::parse(4, raw.clone()).unwrap();

    assert_eq!(record.id, 4);
    assert_eq!(record.subject.as_deref(), Some("Привет"));
    assert_eq!(record.date_header.as_deref(), Some("Fri, 12 Sep 2025 09:00:00 +0300"));
    assert_eq!(
        record.date.map(|d| d.with_timezone(&Utc)),
        Some(Utc.with_ymd_and_hms(2025, 9, 12, 6, 0, 0).unwrap())
    );
    assert_eq!(record.content, raw);
}
