//! Field-by-field extraction of a project detail page
//!
//! The detail markup has no guaranteed schema: any section may be missing or
//! empty on a given page. Each field below is an independent lookup, and a
//! miss only leaves that one field unset.

use crate::config::SiteProfile;
use crate::extract::query::{
    field_attr, field_text, find_all, find_field, find_nth, text_of,
};
use crate::model::{Member, Mentor, ProjectDetail, Registrant, TeamInfo};
use crate::url::{normalize, ProjectTokens};
use scraper::{ElementRef, Html};

const TITLE: &str = ".dw_title div p";
const SUMMARY: &str = ".work_detail div";
const REPRESENTATIVE_IMAGE: &str = ".dw_title div img";
const PRESENTATION: &str = "#pdfArea";
const VIDEO: &str = ".dw_video iframe";
const LIKE_COUNT: &str = "#likeCnt";
const COMMENT_COUNT: &str = "#commentCnt";
const TEAM_WRAPS: &str = ".dw_resistrant .dw_wrap";

/// Longest heading text still considered a section label
const MAX_LABEL_CHARS: usize = 20;

/// Sub-sections of the team block, in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TeamSection {
    Registrant,
    Members,
    Mentor,
    Repository,
    Description,
}

impl TeamSection {
    const ALL: [TeamSection; 5] = [
        Self::Registrant,
        Self::Members,
        Self::Mentor,
        Self::Repository,
        Self::Description,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Heading keywords announcing this section (matched case-insensitively)
    fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Registrant => &["등록자", "registrant"],
            Self::Members => &["팀원", "member"],
            Self::Mentor => &["멘토", "mentor"],
            Self::Repository => &["git", "저장소", "repository"],
            Self::Description => &["간략설명", "설명", "description"],
        }
    }

    fn matches(self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.labels().iter().any(|keyword| label.contains(keyword))
    }

    /// True if the wrapper's content can only belong to this section
    fn has_shape(self, wrap: ElementRef<'_>) -> bool {
        match self {
            Self::Registrant => find_field(wrap, ".dw3 p, .dw4 p, .dw5 p").is_some(),
            Self::Repository => find_field(wrap, ".dw5 a").is_some(),
            Self::Description => {
                find_field(wrap, ".dw5").is_some()
                    && find_field(wrap, ".dw2, .dw3, .dw4, .dw5 a, .dw5 p").is_none()
            }
            Self::Members | Self::Mentor => false,
        }
    }
}

/// Where each team sub-section lives in one document
///
/// Wrappers are assigned in three passes, each only over wrappers and
/// sections still unassigned:
/// 1. a heading naming the section;
/// 2. a shape only that section has (a `.dw5` link for the repository,
///    paragraph-wrapped values for the registrant, a lone `.dw5` for the
///    description);
/// 3. page order: the next free wrapper after the previous section's, but
///    never past a wrapper already held by a later section.
///
/// A page that drops or labels one section therefore never shifts the
/// sections around it.
struct TeamLayout<'a> {
    sections: [Option<ElementRef<'a>>; 5],
}

impl<'a> TeamLayout<'a> {
    fn locate(root: ElementRef<'a>) -> Self {
        let wraps = find_all(root, TEAM_WRAPS);
        let mut slots: [Option<usize>; 5] = [None; 5];
        let mut claimed = vec![false; wraps.len()];

        for (i, wrap) in wraps.iter().enumerate() {
            let label = match section_label(*wrap) {
                Some(label) => label,
                None => continue,
            };
            let section = TeamSection::ALL
                .iter()
                .copied()
                .find(|s| slots[s.index()].is_none() && s.matches(&label));
            if let Some(section) = section {
                tracing::trace!("Team wrapper {} labeled {:?}", i + 1, section);
                slots[section.index()] = Some(i);
                claimed[i] = true;
            }
        }

        for section in TeamSection::ALL {
            if slots[section.index()].is_some() {
                continue;
            }
            let found = (0..wraps.len()).find(|&i| !claimed[i] && section.has_shape(wraps[i]));
            if let Some(i) = found {
                slots[section.index()] = Some(i);
                claimed[i] = true;
            }
        }

        let mut cursor = 0;
        for (n, section) in TeamSection::ALL.iter().copied().enumerate() {
            if let Some(i) = slots[section.index()] {
                cursor = cursor.max(i + 1);
                continue;
            }
            let limit = TeamSection::ALL[n + 1..]
                .iter()
                .filter_map(|later| slots[later.index()])
                .min()
                .unwrap_or(wraps.len());
            if let Some(i) = (cursor..limit).find(|&i| !claimed[i]) {
                slots[section.index()] = Some(i);
                claimed[i] = true;
                cursor = i + 1;
            }
        }

        Self {
            sections: slots.map(|slot| slot.map(|i| wraps[i])),
        }
    }

    fn get(&self, section: TeamSection) -> Option<ElementRef<'a>> {
        self.sections[section.index()]
    }
}

/// Text of a wrapper's leading heading element, if it has one
fn section_label(wrap: ElementRef<'_>) -> Option<String> {
    let first = wrap.children().filter_map(ElementRef::wrap).next()?;
    let element = first.value();

    let is_heading = matches!(
        element.name(),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "dt" | "strong" | "label" | "th"
    ) || element.classes().any(|class| class.contains("tit"));

    if !is_heading {
        return None;
    }

    let label = text_of(first);
    if label.is_empty() || label.chars().count() > MAX_LABEL_CHARS {
        return None;
    }
    Some(label)
}

/// Extracts a project detail record from one page's markup
///
/// Identity tokens (`uid`, `term`) come from `source_url`, never from the
/// markup. The presentation and representative-image URLs are resolved
/// against the site base URL; the video URL is kept exactly as found since
/// it normally embeds a third-party player URL.
///
/// This never fails: a section that cannot be found leaves its fields unset.
///
/// # Example
///
/// ```
/// use softcon_harvest::config::SiteProfile;
/// use softcon_harvest::extract::extract_detail;
///
/// let html = r#"<div class="dw_title"><div><p> Smart Campus </p></div></div>
///               <span id="likeCnt">12</span>"#;
/// let url = "https://softcon.ajou.ac.kr/works/works.asp?uid=3";
/// let detail = extract_detail(html, url, &SiteProfile::default());
/// assert_eq!(detail.title.as_deref(), Some("Smart Campus"));
/// assert_eq!(detail.like_count.as_deref(), Some("12"));
/// assert_eq!(detail.uid.as_deref(), Some("3"));
/// assert_eq!(detail.summary, None);
/// ```
pub fn extract_detail(detail_html: &str, source_url: &str, site: &SiteProfile) -> ProjectDetail {
    let document = Html::parse_document(detail_html);
    let root = document.root_element();
    let tokens = ProjectTokens::from_url(source_url);
    let team = TeamLayout::locate(root);

    ProjectDetail {
        url: source_url.to_string(),
        uid: tokens.uid,
        term: tokens.term,
        title: field_text(root, TITLE),
        summary: find_nth(root, SUMMARY, 1).map(text_of),
        description: team
            .get(TeamSection::Description)
            .and_then(|section| field_text(section, ".dw5")),
        team_info: Some(extract_team_info(&team)),
        git_repository: team
            .get(TeamSection::Repository)
            .and_then(|section| field_attr(section, ".dw5 a", "href")),
        presentation_url: field_attr(root, PRESENTATION, "src")
            .map(|src| normalize(site.base(), &src)),
        video_url: field_attr(root, VIDEO, "src"),
        representative_image: field_attr(root, REPRESENTATIVE_IMAGE, "src")
            .map(|src| normalize(site.base(), &src)),
        like_count: field_text(root, LIKE_COUNT),
        comment_count: field_text(root, COMMENT_COUNT),
        error: None,
    }
}

fn extract_team_info(team: &TeamLayout<'_>) -> TeamInfo {
    TeamInfo {
        registrant: team.get(TeamSection::Registrant).map(extract_registrant),
        members: team
            .get(TeamSection::Members)
            .map(extract_members)
            .unwrap_or_default(),
        mentor: team
            .get(TeamSection::Mentor)
            .map(extract_mentor)
            .filter(|mentor| !mentor.is_empty()),
    }
}

fn extract_registrant(section: ElementRef<'_>) -> Registrant {
    Registrant {
        department: field_text(section, ".dw3 p"),
        grade: field_text(section, ".dw4 p"),
        email: field_text(section, ".dw5 p"),
    }
}

/// One member per roster row; rows where nothing was found are dropped
fn extract_members(section: ElementRef<'_>) -> Vec<Member> {
    find_all(section, "ul")
        .into_iter()
        .map(|row| Member {
            role: field_text(row, ".dw1 span"),
            name: field_text(row, ".dw2"),
            department: field_text(row, ".dw3"),
            grade: field_text(row, ".dw4"),
            email: field_text(row, ".dw5"),
        })
        .filter(|member| !member.is_empty())
        .collect()
}

fn extract_mentor(section: ElementRef<'_>) -> Mentor {
    Mentor {
        name: field_text(section, ".dw2"),
        affiliation: field_text(section, ".dw3"),
    }
}
