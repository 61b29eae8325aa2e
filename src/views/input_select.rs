/// Value/label pair shown for one dropdown entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Terminal rendition of a dropdown selector
pub struct InputSelect<'a, T> {
    pub label: &'a str,
    pub loading_label: &'a str,
    pub is_loading: bool,
    pub items: Vec<&'a T>,
    /// Value of the selected item; `None` falls back to the first item
    pub selected: Option<&'a str>,
    pub parse_item: fn(&T) -> SelectOption,
}

impl<'a, T> InputSelect<'a, T> {
    /// Find the item whose value matches exactly, or whose label matches
    /// ignoring case
    pub fn resolve(&self, input: &str) -> Option<&'a T> {
        let input = input.trim();
        self.items
            .iter()
            .find(|item| (self.parse_item)(item).value == input)
            .or_else(|| {
                self.items
                    .iter()
                    .find(|item| (self.parse_item)(item).label.eq_ignore_ascii_case(input))
            })
            .copied()
    }

    pub fn render(&self) -> String {
        let mut output = format!("{}\n", self.label);

        if self.is_loading {
            output.push_str(&format!("  {}...", self.loading_label));
            return output;
        }

        for (idx, item) in self.items.iter().enumerate() {
            let option = (self.parse_item)(item);
            let is_selected = match self.selected {
                Some(value) => option.value == value,
                None => idx == 0,
            };
            let marker = if is_selected { '>' } else { ' ' };
            if option.value.is_empty() {
                output.push_str(&format!("{} {}\n", marker, option.label));
            } else {
                output.push_str(&format!("{} {} [{}]\n", marker, option.label, option.value));
            }
        }

        output.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Employee;
    use crate::testing::employee;

    fn employee_option(item: &Employee) -> SelectOption {
        SelectOption {
            value: item.id.clone(),
            label: item.full_name(),
        }
    }

    fn select<'a>(
        items: Vec<&'a Employee>,
        selected: Option<&'a str>,
    ) -> InputSelect<'a, Employee> {
        InputSelect {
            label: "Filter by employee",
            loading_label: "Loading employees",
            is_loading: false,
            items,
            selected,
            parse_item: employee_option,
        }
    }

    #[test]
    fn resolves_by_value_then_label() {
        let all = Employee::all_employees();
        let alice = employee("2", "Alice", "Doe");
        let input = select(vec![&all, &alice], None);

        assert_eq!(input.resolve("2"), Some(&alice));
        assert_eq!(input.resolve("alice doe"), Some(&alice));
        assert_eq!(input.resolve("All Employees"), Some(&all));
        assert_eq!(input.resolve("nobody"), None);
    }

    #[test]
    fn marks_selected_entry() {
        let all = Employee::all_employees();
        let alice = employee("2", "Alice", "Doe");

        let rendered = select(vec![&all, &alice], Some("2")).render();
        assert!(rendered.contains("  All Employees\n"));
        assert!(rendered.contains("> Alice Doe [2]"));

        let rendered = select(vec![&all, &alice], None).render();
        assert!(rendered.contains("> All Employees"));
    }

    #[test]
    fn loading_hides_items() {
        let alice = employee("2", "Alice", "Doe");
        let mut input = select(vec![&alice], None);
        input.is_loading = true;

        let rendered = input.render();
        assert!(rendered.contains("Loading employees..."));
        assert!(!rendered.contains("Alice"));
    }
}
