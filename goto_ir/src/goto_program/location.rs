// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use crate::{InternStringOption, InternedString};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A `Location` represents a source location.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Unknown source location
    #[default]
    None,
    /// Location in user code.
    /// `function` is `None` for global, `Some(function_name)` for function local.
    Loc {
        file: InternedString,
        function: Option<InternedString>,
        start_line: u64,
        start_col: Option<u64>,
        end_line: u64,
        end_col: Option<u64>,
    },
    /// Location for statements that use property class and description: Assert, Assume, etc.
    Property {
        file: Option<InternedString>,
        function: Option<InternedString>,
        line: Option<u64>,
        col: Option<u64>,
        comment: InternedString,
        property_class: InternedString,
    },
    /// Covers cases where Location Details are unknown or set as None but Property Class is needed.
    PropertyUnknownLocation { comment: InternedString, property_class: InternedString },
}

/// Getters and predicates
impl Location {
    pub fn is_none(&self) -> bool {
        match self {
            Location::None => true,
            _ => false,
        }
    }

    pub fn function(&self) -> Option<InternedString> {
        match self {
            Location::Loc { function, .. } | Location::Property { function, .. } => *function,
            _ => None,
        }
    }

    pub fn start_line(&self) -> Option<u64> {
        match self {
            Location::Loc { start_line, .. } => Some(*start_line),
            Location::Property { line, .. } => *line,
            _ => None,
        }
    }

    /// The property class of a property location, e.g. `pointer dereference`.
    pub fn property_class(&self) -> Option<InternedString> {
        match self {
            Location::Property { property_class, .. }
            | Location::PropertyUnknownLocation { property_class, .. } => Some(*property_class),
            _ => None,
        }
    }

    /// The human readable description of a property location.
    pub fn comment(&self) -> Option<InternedString> {
        match self {
            Location::Property { comment, .. }
            | Location::PropertyUnknownLocation { comment, .. } => Some(*comment),
            _ => None,
        }
    }

    /// Convert a location to a short string suitable for (e.g.) logging.
    /// Goal is to return just "file:line" as clearly as possible.
    pub fn short_string(&self) -> String {
        match self {
            Location::None => "<none>".to_string(),
            Location::Loc { file, start_line: line, .. } => format!("{file}:{line}"),
            Location::Property { file: Some(file), line: Some(line), .. } => {
                format!("{file}:{line}")
            }
            Location::Property { file: Some(file), line: None, .. } => file.to_string(),
            Location::Property { function: Some(function), .. } => format!("<{function}>"),
            Location::Property { .. } | Location::PropertyUnknownLocation { .. } => {
                "<none>".to_string()
            }
        }
    }
}

/// Constructors
impl Location {
    pub fn new<T, U: Into<InternedString>, V: Into<InternedString>>(
        file: U,
        function: Option<V>,
        start_line: T,
        start_col: Option<T>,
        end_line: T,
        end_col: Option<T>,
    ) -> Location
    where
        T: TryInto<u64>,
        T::Error: Debug,
    {
        let file_into = file.into();
        let start_line_into = start_line.try_into().unwrap();
        let start_col_into = start_col.map(|x| x.try_into().unwrap());
        let end_line_into = end_line.try_into().unwrap();
        let end_col_into = end_col.map(|x| x.try_into().unwrap());
        let function_into = function.intern();
        Location::Loc {
            file: file_into,
            function: function_into,
            start_line: start_line_into,
            start_col: start_col_into,
            end_line: end_line_into,
            end_col: end_col_into,
        }
    }

    /// Create a Property type Location from an already existing Location type.
    /// A location that already carries a property gets the new comment and property class.
    pub fn create_location_with_property<T: Into<InternedString>, U: Into<InternedString>>(
        comment: T,
        property_name: U,
        location: Self,
    ) -> Self {
        let comment = comment.into();
        let property_class = property_name.into();
        match location {
            Location::Loc { file, function, start_line, start_col, .. } => Location::Property {
                file: Some(file),
                function,
                line: Some(start_line),
                col: start_col,
                comment,
                property_class,
            },
            Location::Property { file, function, line, col, .. } => {
                Location::Property { file, function, line, col, comment, property_class }
            }
            Location::PropertyUnknownLocation { .. } => {
                Location::PropertyUnknownLocation { comment, property_class }
            }
            Location::None => Location::PropertyUnknownLocation { comment, property_class },
        }
    }

    pub fn none() -> Location {
        Location::None
    }
}
