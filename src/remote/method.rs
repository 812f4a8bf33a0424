use crate::remote::error::RemoteError;
use std::fmt;
use std::str::FromStr;

/// Every operation reachable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    CreateCustomList,
    CreateCustomLists,
    UpdateListName,
    RemoveList,
    FetchAllLists,
    FetchListById,
    FetchListIgnoreCase,
    FetchListPagesById,
    FetchListPagesByUrl,
    FetchListNameSuggestions,
    InsertPageToList,
    RemovePageFromList,
    AddOpenTabsToList,
    RemoveOpenTabsFromList,
    CreateAnnotation,
    EditAnnotation,
    DeleteAnnotation,
    GetAnnotationByUrl,
    GetAllAnnotationsByUrl,
    ToggleAnnotBookmark,
    AnnotHasBookmark,
    DeleteBookmarkByUrl,
    InsertAnnotToList,
    RemoveAnnotFromList,
    FetchAnnotationLists,
    EditAnnotationTags,
    AddAnnotationTag,
    DelAnnotationTag,
    GetAnnotationTags,
    IndexPageFromTab,
    EnsurePage,
}

impl Method {
    pub const ALL: [Method; 31] = [
        Method::CreateCustomList,
        Method::CreateCustomLists,
        Method::UpdateListName,
        Method::RemoveList,
        Method::FetchAllLists,
        Method::FetchListById,
        Method::FetchListIgnoreCase,
        Method::FetchListPagesById,
        Method::FetchListPagesByUrl,
        Method::FetchListNameSuggestions,
        Method::InsertPageToList,
        Method::RemovePageFromList,
        Method::AddOpenTabsToList,
        Method::RemoveOpenTabsFromList,
        Method::CreateAnnotation,
        Method::EditAnnotation,
        Method::DeleteAnnotation,
        Method::GetAnnotationByUrl,
        Method::GetAllAnnotationsByUrl,
        Method::ToggleAnnotBookmark,
        Method::AnnotHasBookmark,
        Method::DeleteBookmarkByUrl,
        Method::InsertAnnotToList,
        Method::RemoveAnnotFromList,
        Method::FetchAnnotationLists,
        Method::EditAnnotationTags,
        Method::AddAnnotationTag,
        Method::DelAnnotationTag,
        Method::GetAnnotationTags,
        Method::IndexPageFromTab,
        Method::EnsurePage,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Method::CreateCustomList => "createCustomList",
            Method::CreateCustomLists => "createCustomLists",
            Method::UpdateListName => "updateListName",
            Method::RemoveList => "removeList",
            Method::FetchAllLists => "fetchAllLists",
            Method::FetchListById => "fetchListById",
            Method::FetchListIgnoreCase => "fetchListIgnoreCase",
            Method::FetchListPagesById => "fetchListPagesById",
            Method::FetchListPagesByUrl => "fetchListPagesByUrl",
            Method::FetchListNameSuggestions => "fetchListNameSuggestions",
            Method::InsertPageToList => "insertPageToList",
            Method::RemovePageFromList => "removePageFromList",
            Method::AddOpenTabsToList => "addOpenTabsToList",
            Method::RemoveOpenTabsFromList => "removeOpenTabsFromList",
            Method::CreateAnnotation => "createAnnotation",
            Method::EditAnnotation => "editAnnotation",
            Method::DeleteAnnotation => "deleteAnnotation",
            Method::GetAnnotationByUrl => "getAnnotationByUrl",
            Method::GetAllAnnotationsByUrl => "getAllAnnotationsByUrl",
            Method::ToggleAnnotBookmark => "toggleAnnotBookmark",
            Method::AnnotHasBookmark => "annotHasBookmark",
            Method::DeleteBookmarkByUrl => "deleteBookmarkByUrl",
            Method::InsertAnnotToList => "insertAnnotToList",
            Method::RemoveAnnotFromList => "removeAnnotFromList",
            Method::FetchAnnotationLists => "fetchAnnotationLists",
            Method::EditAnnotationTags => "editAnnotationTags",
            Method::AddAnnotationTag => "addAnnotationTag",
            Method::DelAnnotationTag => "delAnnotationTag",
            Method::GetAnnotationTags => "getAnnotationTags",
            Method::IndexPageFromTab => "indexPageFromTab",
            Method::EnsurePage => "ensurePage",
        }
    }
}

impl FromStr for Method {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| RemoteError::UnknownMethod(s.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn given_every_method_when_parsing_its_name_then_round_trips() {
        for method in Method::ALL {
            assert_eq!(method.name().parse::<Method>().unwrap(), method);
        }
        let names: HashSet<&str> = Method::ALL.iter().map(Method::name).collect();
        assert_eq!(names.len(), Method::ALL.len());
    }

    #[test]
    fn given_unknown_name_when_parse_then_unknown_method() {
        let err = "dropEverything".parse::<Method>().unwrap_err();
        assert!(matches!(err, RemoteError::UnknownMethod(name) if name == "dropEverything"));
    }
}
