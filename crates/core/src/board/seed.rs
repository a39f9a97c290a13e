//! Initial board contents used when no snapshot has been saved yet

use chrono::NaiveDate;

use super::model::{Board, BoardSnapshot, Column, Priority, Task, User};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn user(id: &str, name: &str, avatar: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        avatar: avatar.to_string(),
    }
}

fn column(id: &str, title: &str, task_ids: &[&str], order: usize) -> Column {
    Column {
        id: id.to_string(),
        title: title.to_string(),
        board_id: "board1".to_string(),
        task_ids: task_ids.iter().map(|id| id.to_string()).collect(),
        order,
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    description: &str,
    column_id: &str,
    created_by: &str,
    assigned_to: &str,
    priority: Priority,
    due_date: NaiveDate,
    created_date: NaiveDate,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        column_id: column_id.to_string(),
        created_by: created_by.to_string(),
        assigned_to: assigned_to.to_string(),
        priority,
        due_date: Some(due_date),
        created_date,
    }
}

/// One board with three columns, seven tasks and two users
pub fn seed_snapshot() -> BoardSnapshot {
    let users = [
        user(
            "user1",
            "Subhadeep Das",
            "https://images.pexels.com/photos/1222271/pexels-photo-1222271.jpeg?auto=compress&cs=tinysrgb&w=100&h=100&dpr=1",
        ),
        user(
            "user2",
            "Susmita Sarkar",
            "https://images.pexels.com/photos/1239291/pexels-photo-1239291.jpeg?auto=compress&cs=tinysrgb&w=100&h=100&dpr=1",
        ),
    ];

    let board = Board {
        id: "board1".to_string(),
        name: "Marketing Campaign".to_string(),
        created_by: "user1".to_string(),
        created_date: date(2023, 8, 15),
        column_count: 3,
    };

    let columns = [
        column("col1", "To Do", &["task1", "task2", "task3"], 0),
        column("col2", "In Progress", &["task4", "task5"], 1),
        column("col3", "Completed", &["task6", "task7"], 2),
    ];

    let tasks = [
        task(
            "task1",
            "Design the landing page",
            "Create a visually appealing and user-friendly landing page for the new product.",
            "col1",
            "user1",
            "user2",
            Priority::High,
            date(2023, 10, 25),
            date(2023, 10, 15),
        ),
        task(
            "task2",
            "Implement user authentication",
            "Set up a secure user authentication system.",
            "col1",
            "user1",
            "user2",
            Priority::Medium,
            date(2023, 11, 2),
            date(2023, 10, 16),
        ),
        task(
            "task3",
            "Write API documentation",
            "Create comprehensive documentation for the backend API.",
            "col1",
            "user1",
            "user2",
            Priority::Low,
            date(2023, 11, 15),
            date(2023, 10, 17),
        ),
        task(
            "task4",
            "Develop the core features",
            "Implement the main functionalities of the application.",
            "col2",
            "user1",
            "user2",
            Priority::High,
            date(2023, 10, 30),
            date(2023, 10, 18),
        ),
        task(
            "task5",
            "Set up the database",
            "Configure and optimize the database for the application.",
            "col2",
            "user1",
            "user2",
            Priority::Medium,
            date(2023, 11, 5),
            date(2023, 10, 19),
        ),
        task(
            "task6",
            "Plan the project roadmap",
            "Define the project goals, milestones, and timelines.",
            "col3",
            "user1",
            "user2",
            Priority::High,
            date(2023, 10, 10),
            date(2023, 10, 1),
        ),
        task(
            "task7",
            "Gather user requirements",
            "Collect and analyze user needs and expectations.",
            "col3",
            "user2",
            "user1",
            Priority::Medium,
            date(2023, 10, 5),
            date(2023, 9, 25),
        ),
    ];

    BoardSnapshot {
        boards: [(board.id.clone(), board)].into_iter().collect(),
        columns: columns.into_iter().map(|c| (c.id.clone(), c)).collect(),
        tasks: tasks.into_iter().map(|t| (t.id.clone(), t)).collect(),
        users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        current_user_id: "user1".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_contents() {
        let seed = seed_snapshot();
        assert_eq!(seed.boards.len(), 1);
        assert_eq!(seed.columns.len(), 3);
        assert_eq!(seed.tasks.len(), 7);
        assert_eq!(seed.users.len(), 2);
        assert_eq!(seed.current_user().map(|u| u.name.as_str()), Some("Subhadeep Das"));
    }

    #[test]
    fn test_seed_attribution_uses_user_ids() {
        let seed = seed_snapshot();
        assert!(seed.users.contains_key(&seed.boards["board1"].created_by));
        for task in seed.tasks.values() {
            assert!(seed.users.contains_key(&task.created_by));
            assert!(seed.users.contains_key(&task.assigned_to));
        }
    }
}
