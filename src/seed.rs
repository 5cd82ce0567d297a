use serde_json::json;

use crate::{
    auth::password::hash_password,
    entities::{
        project::NewProject,
        skill::NewSkill,
        user::{RegisterUser, Role, User, UserInsert},
    },
    errors::AppError,
    repositories::{
        project::ProjectRepository,
        skill::SkillRepository,
        user::{UserRepository, DUPLICATE_USER},
    },
};

/// Counts written by [`seed_portfolio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub projects_removed: u64,
    pub skills_removed: u64,
    pub projects_inserted: usize,
    pub skills_inserted: usize,
}

pub fn sample_projects() -> anyhow::Result<Vec<NewProject>> {
    let projects = json!([
      {
        "title": "E-Commerce Platform",
        "description": "A full-stack e-commerce platform built with React, Node.js, and MongoDB. Features include user authentication, payment processing, and admin dashboard.",
        "longDescription": "This comprehensive e-commerce platform was built from scratch using modern web technologies. The frontend is built with React and TypeScript, providing a smooth and responsive user experience. The backend uses Node.js with Express and MongoDB for data persistence. Key features include secure user authentication, real-time inventory management, integrated payment processing with Stripe, and a comprehensive admin dashboard for managing products, orders, and customers.",
        "technologies": ["React", "TypeScript", "Node.js", "Express", "MongoDB", "Stripe", "Tailwind CSS"],
        "images": ["/images/ecommerce-1.jpg", "/images/ecommerce-2.jpg"],
        "githubUrl": "https://github.com/yourusername/ecommerce-platform",
        "liveUrl": "https://ecommerce-demo.vercel.app",
        "featured": true,
        "category": "web",
        "status": "completed",
        "startDate": "2023-01-15",
        "endDate": "2023-06-30"
      },
      {
        "title": "Task Management App",
        "description": "A collaborative task management application with real-time updates, drag-and-drop functionality, and team collaboration features.",
        "longDescription": "Built with React and Socket.io for real-time collaboration, this task management app allows teams to work together seamlessly. Features include drag-and-drop task organization, real-time updates, file attachments, comments, and deadline tracking. The app uses a modern tech stack with React for the frontend, Node.js for the backend, and Socket.io for real-time communication.",
        "technologies": ["React", "Socket.io", "Node.js", "PostgreSQL", "Material-UI", "Redux"],
        "images": ["/images/taskapp-1.jpg", "/images/taskapp-2.jpg"],
        "githubUrl": "https://github.com/yourusername/task-management-app",
        "liveUrl": "https://taskapp-demo.netlify.app",
        "featured": true,
        "category": "web",
        "status": "completed",
        "startDate": "2023-03-01",
        "endDate": "2023-08-15"
      },
      {
        "title": "Weather Dashboard",
        "description": "A responsive weather dashboard with location-based forecasts, interactive maps, and detailed weather analytics.",
        "longDescription": "This weather dashboard provides comprehensive weather information with an intuitive interface. It integrates with multiple weather APIs to provide accurate forecasts, interactive maps showing weather patterns, and detailed analytics. The app features location-based services, customizable widgets, and responsive design that works perfectly on all devices.",
        "technologies": ["React", "TypeScript", "Chart.js", "OpenWeather API", "Leaflet", "CSS Modules"],
        "images": ["/images/weather-1.jpg", "/images/weather-2.jpg"],
        "githubUrl": "https://github.com/yourusername/weather-dashboard",
        "liveUrl": "https://weather-dashboard.vercel.app",
        "featured": true,
        "category": "web",
        "status": "completed",
        "startDate": "2023-05-01",
        "endDate": "2023-07-15"
      },
      {
        "title": "Mobile Banking App",
        "description": "A secure mobile banking application with biometric authentication, transaction history, and money transfer capabilities.",
        "longDescription": "Developed using React Native, this mobile banking app provides a secure and user-friendly banking experience. Key features include biometric authentication, secure transaction processing, real-time balance updates, transaction history, money transfers, bill payments, and push notifications. The app follows banking security standards and includes features like transaction limits and fraud detection.",
        "technologies": ["React Native", "TypeScript", "Firebase", "Biometric Auth", "Redux Toolkit", "React Navigation"],
        "images": ["/images/banking-1.jpg", "/images/banking-2.jpg"],
        "githubUrl": "https://github.com/yourusername/mobile-banking-app",
        "featured": true,
        "category": "mobile",
        "status": "in-progress",
        "startDate": "2023-09-01"
      },
      {
        "title": "Blog CMS",
        "description": "A headless CMS for bloggers with markdown support, SEO optimization, and content scheduling features.",
        "longDescription": "This headless CMS is designed specifically for bloggers and content creators. It features a rich text editor with markdown support, SEO optimization tools, content scheduling, media management, and analytics. The system is built with a modern architecture that separates content management from presentation, making it flexible and scalable.",
        "technologies": ["Next.js", "Strapi", "PostgreSQL", "GraphQL", "Tailwind CSS", "Prisma"],
        "images": ["/images/cms-1.jpg", "/images/cms-2.jpg"],
        "githubUrl": "https://github.com/yourusername/blog-cms",
        "liveUrl": "https://blog-cms-demo.vercel.app",
        "featured": false,
        "category": "web",
        "status": "completed",
        "startDate": "2023-02-01",
        "endDate": "2023-04-30"
      },
      {
        "title": "Desktop File Manager",
        "description": "A cross-platform desktop file manager with cloud sync, file preview, and advanced search capabilities.",
        "longDescription": "Built with Electron and React, this desktop file manager provides a modern interface for managing files and folders. Features include cloud synchronization with Google Drive and Dropbox, file preview for various formats, advanced search with filters, batch operations, and customizable themes. The app works seamlessly across Windows, macOS, and Linux.",
        "technologies": ["Electron", "React", "TypeScript", "Node.js", "SQLite", "Electron Store"],
        "images": ["/images/filemanager-1.jpg", "/images/filemanager-2.jpg"],
        "githubUrl": "https://github.com/yourusername/desktop-file-manager",
        "featured": false,
        "category": "desktop",
        "status": "planned",
        "startDate": "2024-01-01"
      }
    ]);

    Ok(serde_json::from_value(projects)?)
}

pub fn sample_skills() -> Vec<NewSkill> {
    [
        ("React", "frontend", 95, "⚛️", "#61DAFB", true),
        ("TypeScript", "frontend", 90, "🔷", "#3178C6", true),
        ("Next.js", "frontend", 85, "▲", "#000000", true),
        ("Vue.js", "frontend", 80, "💚", "#4FC08D", false),
        ("Angular", "frontend", 75, "🔴", "#DD0031", false),
        ("Tailwind CSS", "frontend", 90, "🎨", "#06B6D4", true),
        ("Sass", "frontend", 85, "💅", "#CC6699", false),
        ("Material-UI", "frontend", 80, "🎭", "#0081CB", false),
        ("Node.js", "backend", 90, "🟢", "#339933", true),
        ("Express.js", "backend", 88, "🚀", "#000000", true),
        ("Python", "backend", 85, "🐍", "#3776AB", true),
        ("Django", "backend", 80, "🎯", "#092E20", false),
        ("FastAPI", "backend", 75, "⚡", "#009688", false),
        ("GraphQL", "backend", 82, "🔺", "#E10098", false),
        ("REST APIs", "backend", 90, "🌐", "#FF6B6B", true),
        ("MongoDB", "database", 85, "🍃", "#47A248", true),
        ("PostgreSQL", "database", 80, "🐘", "#336791", true),
        ("MySQL", "database", 75, "🐬", "#4479A1", false),
        ("Redis", "database", 70, "🔴", "#DC382D", false),
        ("Firebase", "database", 85, "🔥", "#FFCA28", true),
        ("Git", "tools", 90, "📚", "#F05032", true),
        ("Docker", "tools", 80, "🐳", "#2496ED", true),
        ("AWS", "tools", 75, "☁️", "#FF9900", true),
        ("Vercel", "tools", 85, "▲", "#000000", false),
        ("Netlify", "tools", 80, "🌐", "#00C7B7", false),
        ("Jest", "tools", 75, "🧪", "#C21325", false),
        ("Webpack", "tools", 70, "📦", "#8DD6F9", false),
        ("Figma", "tools", 85, "🎨", "#F24E1E", false),
    ]
    .into_iter()
    .map(|(name, category, proficiency, icon, color, featured)| NewSkill {
        name: Some(name.to_string()),
        category: Some(category.to_string()),
        proficiency: Some(proficiency),
        icon: Some(icon.to_string()),
        color: Some(color.to_string()),
        featured: Some(featured),
    })
    .collect()
}

/// Replaces every project and skill with the sample portfolio.
///
/// Each record goes through the same validation as the API, so an invalid
/// sample aborts the run before anything else is written.
pub async fn seed_portfolio(
    projects: &dyn ProjectRepository,
    skills: &dyn SkillRepository,
) -> Result<SeedReport, AppError> {
    let project_inserts = sample_projects()?
        .into_iter()
        .map(NewProject::into_insert)
        .collect::<Result<Vec<_>, _>>()?;
    let skill_inserts = sample_skills()
        .into_iter()
        .map(NewSkill::into_insert)
        .collect::<Result<Vec<_>, _>>()?;

    let projects_removed = projects.delete_all().await?;
    let skills_removed = skills.delete_all().await?;

    for project in &project_inserts {
        projects.create(project).await?;
    }
    tracing::info!("✅ {} sample projects inserted", project_inserts.len());

    for skill in &skill_inserts {
        skills.create(skill).await?;
    }
    tracing::info!("✅ {} sample skills inserted", skill_inserts.len());

    Ok(SeedReport {
        projects_removed,
        skills_removed,
        projects_inserted: project_inserts.len(),
        skills_inserted: skill_inserts.len(),
    })
}

/// Creates an admin account, applying the registration rules.
pub async fn create_admin(
    users: &dyn UserRepository,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let registration = RegisterUser {
        username: Some(username.to_string()),
        email: Some(email.to_string()),
        password: Some(password.to_string()),
    }
    .validated()?;

    if users
        .identity_taken(Some(registration.username.clone()), Some(registration.email.clone()), None)
        .await?
    {
        return Err(AppError::Conflict(DUPLICATE_USER.to_string()));
    }

    users
        .create_user(&UserInsert {
            username: registration.username,
            email: registration.email,
            password_hash: hash_password(&registration.password)?,
            role: Role::Admin,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory::MemoryStore,
        entities::project::{ProjectFilter, ProjectSort},
        entities::skill::SkillFilter,
        listing::Sort,
    };

    #[test]
    fn every_sample_passes_validation() {
        for project in sample_projects().unwrap() {
            project.into_insert().unwrap();
        }
        for skill in sample_skills() {
            skill.into_insert().unwrap();
        }
    }

    #[actix_rt::test]
    async fn seeding_twice_replaces_rather_than_duplicates() {
        let store = MemoryStore::new();

        let first = seed_portfolio(&store, &store).await.unwrap();
        assert_eq!(first.projects_removed, 0);

        let second = seed_portfolio(&store, &store).await.unwrap();
        assert_eq!(second.projects_removed as usize, first.projects_inserted);
        assert_eq!(second.skills_removed as usize, first.skills_inserted);

        let stored = ProjectRepository::count(&store, &ProjectFilter::default()).await.unwrap();
        assert_eq!(stored as usize, first.projects_inserted);
        let stored = SkillRepository::count(&store, &SkillFilter::default()).await.unwrap();
        assert_eq!(stored as usize, first.skills_inserted);

        let newest = ProjectRepository::find(&store, &ProjectFilter::featured(), &Sort::desc(ProjectSort::CreatedAt), None)
            .await
            .unwrap();
        assert_eq!(newest.len(), 4);
    }

    #[actix_rt::test]
    async fn admin_is_created_once() {
        let store = MemoryStore::new();

        let admin = create_admin(&store, "site_admin", "Admin@Example.com", "s3cret!").await.unwrap();
        assert!(admin.is_admin());
        assert_eq!(admin.email, "admin@example.com");

        let again = create_admin(&store, "site_admin", "admin@example.com", "s3cret!").await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }
}
